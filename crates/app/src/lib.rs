// CLI modules
pub mod args;
pub mod op;
pub mod ops;

// Logging setup
pub mod logging;

// App state (configuration, paths)
pub mod state;

use ops::{
    Cat, Check, Init, Ls, Meta, Mkdir, Mount, Put, RmSection, Root, Sections, Touch, Unmount,
    Version,
};

command_enum! {
    (Init, Init),
    (Root, Root),
    (Ls, Ls),
    (Mkdir, Mkdir),
    (Touch, Touch),
    (Mount, Mount),
    (Unmount, Unmount),
    (Put, Put),
    (Cat, Cat),
    (RmSection, RmSection),
    (Sections, Sections),
    (Meta, Meta),
    (Check, Check),
    (Version, Version),
}

pub use logging::init_logging;
pub use state::{AppConfig, AppState, StateError};
