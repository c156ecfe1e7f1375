//! # Farmstand Test
//!
//! Drives a [`farmstand_server::App`] in memory: requests go through the
//! full middleware pipeline, router, views and error pages without binding
//! a port.
//!
//! ```ignore
//! use farmstand_test::TestClient;
//!
//! #[tokio::test]
//! async fn creates_a_farm() {
//!     let client = TestClient::new(app());
//!     client
//!         .post("/farms")
//!         .form(&[("name", "Green Acres"), ("city", "Lodi"), ("email", "hi@green.farm")])
//!         .send()
//!         .await
//!         .assert_redirect("/farms");
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/farmstand-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use response::TestResponse;
