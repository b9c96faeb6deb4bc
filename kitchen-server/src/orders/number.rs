//! Display order numbers (`D000` - `D999`)
//!
//! Labels only: they are not unique and never used as keys.

use rand::Rng;

pub const ORDER_NUMBER_PREFIX: char = 'D';

pub fn generate_order_number() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1000);
    format!("{ORDER_NUMBER_PREFIX}{n:03}")
}
