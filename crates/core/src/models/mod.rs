//! Client-side views of records owned by the Tashih service.
//!
//! The client never persists or mutates these; every screen re-fetches them.
//! Request bodies (`Create*`, `Review*`) live next to the entity they target.

pub mod actor;
pub mod dashboard;
pub mod pagination;
pub mod taqrir_jamai;
pub mod taqrir_khass;
pub mod verification_status;

pub use actor::{Actor, ReviewerIdentity};
pub use dashboard::{DocumentTashihSummary, ReviewQueue, TashihStatistics};
pub use pagination::{Paginated, TaqrirListQuery};
pub use taqrir_jamai::{CreateTaqrirJamai, ReviewTaqrirJamai, TaqrirJamai, TaqrirJamaiReview};
pub use taqrir_khass::{CreateTaqrirKhass, ReviewTaqrirKhass, TaqrirKhass};
pub use verification_status::VerificationStatus;
