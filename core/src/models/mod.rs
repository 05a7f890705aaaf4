//! Data carried through checkout: cart items, the draft order, and the
//! order records that come back from the server.

pub mod cart_item;
pub mod draft;
pub mod order;

pub use cart_item::{CartItem, OpaqueId, StoredCartEntry};
pub use draft::{CheckoutDraft, ContactDetails, DeliveryAddress, ScheduleSelection};
pub use order::{LocalOrderRecord, OrderStatus, PaymentMethod};

/// Whole currency units.
pub type Amount = u64;
