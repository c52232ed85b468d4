//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration loading (file + environment)
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # State Management
//!
//! `AppState` holds the dispatcher, the session supervisor, the JWT keys and
//! the configuration. Each is an explicitly owned, cheaply cloned handle.
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: defaults, TOML file, environment
//! 2. **Key Loading**: RS256 PEM keys
//! 3. **State Creation**: dispatcher and session supervisor
//! 4. **Background Tasks**: terminal-record retention sweep
//! 5. **Router Creation**: routes, CORS and tracing layers
//!
//! # Example
//!
//! ```rust,no_run
//! use taskbeat::backend::server::{config::load_config, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config()?;
//! let app = create_app(config).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::load_config;
pub use init::{create_app, create_app_with_state};
pub use state::AppState;
