pub mod capability;
pub mod decision;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod oracle;
pub mod parser;
pub mod query;
pub mod registry;
pub mod worker;
