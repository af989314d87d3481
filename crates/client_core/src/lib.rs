//! Client core for the bioboard creator dashboard: typed access to the
//! dashboard REST API and the controllers that hold the session's view of
//! links and lead magnets.

pub mod analytics;
pub mod api;
pub mod error;
pub mod lead_magnets;
pub mod links;
pub mod ordering;
pub mod profile;
pub mod session;
pub mod store;
pub mod validation;

pub use api::{ApiClient, SessionContext};
pub use error::{ClientError, Result, ValidationError};
pub use lead_magnets::LeadMagnetController;
pub use links::{LinkListController, LinkListEvent, ReorderFailurePolicy, ReorderOutcome};
pub use session::{landing_for, Landing};
pub use store::{LeadMagnetStore, LinkStore};
pub use validation::{LeadMagnetDraft, LinkDraft, LinkPatch, ProfileDraft};
