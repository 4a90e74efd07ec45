pub mod enums;

pub use enums::{AmbienceSelection, FlashColor, Mode, RunState, Status, Theme, UiMode};
