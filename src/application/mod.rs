pub mod buy_cache;
pub mod catalog_service;
pub mod checkout_service;
pub mod order_service;
