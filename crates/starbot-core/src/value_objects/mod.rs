//! Value objects - immutable types identified by their value

mod snowflake;

pub use snowflake::{Snowflake, SnowflakeParseError};
