pub mod client;
pub mod frame;
pub mod history;

pub use client::FeedClient;
pub use frame::{decode_frame, load_history_file, parse_history};
pub use history::MessageHistory;
