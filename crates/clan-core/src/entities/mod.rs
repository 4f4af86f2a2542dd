//! Domain entities - core business objects

mod guild;
mod member;
mod record;
mod reservation;
mod sl_usage;

pub use guild::{Guild, LedgerScope};
pub use member::Member;
pub use record::DamageRecord;
pub use reservation::{Reservation, ReservationKind};
pub use sl_usage::SlUsage;
