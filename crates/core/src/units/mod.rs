//! Unit accounting module - fund models, engine, services, and traits.

mod units_engine;
mod units_errors;
mod units_model;
mod units_service;
mod units_traits;

pub use units_engine::UnitAccountingEngine;
pub use units_errors::UnitError;
pub use units_model::*;
pub use units_service::FundService;
pub use units_traits::{FundRepositoryTrait, FundServiceTrait};
