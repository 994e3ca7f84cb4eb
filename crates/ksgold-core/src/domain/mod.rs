//! 게이트웨이가 주고받는 정규화된 도메인 모델.

mod contract;
mod market_data;
mod order;
mod position;
mod trade;

pub use contract::*;
pub use market_data::*;
pub use order::*;
pub use position::*;
pub use trade::*;
