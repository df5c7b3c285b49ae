pub mod batch;
pub mod order;
pub mod pizza;
pub mod review;
pub mod settings;
pub mod user;

pub use batch::{Batch, BatchPizza, BatchPizzaDetail};
pub use order::{Order, OrderStatus, OrderType};
pub use pizza::{MenuPizza, Pizza};
pub use review::Review;
pub use settings::Settings;
pub use user::{OtpCode, User};
