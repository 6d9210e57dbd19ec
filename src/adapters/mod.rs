//! Adapters — implementations of the port traits

pub mod channel_sink;
pub mod csv_output;
pub mod iq_file;
pub mod log_sink;

pub use channel_sink::ChannelSink;
pub use csv_output::{CsvAngleWriter, NullOutput};
pub use iq_file::IqFileSource;
pub use log_sink::LogSink;
