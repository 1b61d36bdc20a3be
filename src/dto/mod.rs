//! Wire types exchanged with the MindMuse backend over HTTP and the
//! real-time channel, plus the records persisted locally.

pub mod channel;
pub mod contest;
pub mod http;
pub mod practice;
