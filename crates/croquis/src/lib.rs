//! # Croquis
//!
//! Server for a multiplayer draw-and-guess game. One player per room
//! holds the pen and sketches a word; everyone else races to name it in
//! chat. The server is the single authority on rooms, membership, the
//! drawer role, and guess evaluation; clients only render what they are
//! told.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use croquis::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CroquisError> {
//!     let server = CroquisServer::builder()
//!         .bind("0.0.0.0:9001")
//!         .assets("0.0.0.0:8080", "static")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod assets;
mod error;
mod handler;
mod server;

pub use error::CroquisError;
pub use server::{CroquisServer, CroquisServerBuilder};

/// Everything needed to run or embed the server.
pub mod prelude {
    pub use crate::{CroquisError, CroquisServer, CroquisServerBuilder};
    pub use croquis_protocol::{ClientMessage, ServerMessage, Stroke};
    pub use croquis_room::{WordList, WordSupplier};
}
