pub mod fake_session;

pub use fake_session::{FakeSession, RecordingSink};
