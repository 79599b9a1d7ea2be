pub mod checkout_usecase;
pub mod dto;
pub mod errors;

pub use checkout_usecase::CheckoutUsecase;
pub use dto::{CheckoutResponse, ErrorResponse};
pub use errors::CheckoutError;
