#![deny(missing_docs)]
//! Sign zome calls for the launcher with keys held in a keystore.
//!
//! A [Handler] connects to a keystore once and then signs any number of
//! calls, concurrently if need be, until it is closed. [WeRustHandler] and
//! [ZomeCallSigner] are the two faces the launcher uses, they take and
//! return the camelCase records JavaScript sends. With the `lair_signing`
//! feature a third face, `MossLairClient`, also imports locked seed bundles.
//!
//! # Example
//!
//! ```
//! use we_keystore::test_keystore::*;
//! use we_rust_utils::*;
//! use we_zome_types::prelude::*;
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() {
//!     let keystore = test_keystore().unwrap();
//!     let binding = keystore.bind_local("doc-keystore").unwrap();
//!     let handler = Handler::connect(&binding.url(), TEST_PASSPHRASE).await.unwrap();
//!
//!     let agent: AgentPubKey = TEST_AGENT_PK_1.parse().unwrap();
//!     let (nonce, expires_at) = fresh_nonce(Timestamp::now()).unwrap();
//!     let call = ZomeCallUnsigned {
//!         cell_id: CellId::new(DnaHash::from_raw_32(vec![1; 32]), agent.clone()),
//!         zome_name: "profiles".into(),
//!         fn_name: "get_my_profile".into(),
//!         cap: CallCapability::Unrestricted,
//!         provenance: agent,
//!         payload: vec![0xc0].into(),
//!         nonce,
//!         expires_at,
//!     };
//!     let signed = handler.sign_zome_call(call).await.unwrap();
//!     assert_eq!(64, signed.signature.0.len());
//!
//!     handler.close().await.unwrap();
//! }
//! ```

mod config;
mod error;
mod handler;
mod signer;
mod types;

pub use config::*;
pub use error::*;
pub use handler::*;
pub use signer::*;
pub use types::*;
