pub mod cat;
pub mod check;
pub mod init;
pub mod ls;
pub mod meta;
pub mod mkdir;
pub mod mount;
pub mod put;
pub mod rm_section;
pub mod root;
pub mod sections;
pub mod touch;
pub mod unmount;
pub mod version;

pub use cat::Cat;
pub use check::Check;
pub use init::Init;
pub use ls::Ls;
pub use meta::Meta;
pub use mkdir::Mkdir;
pub use mount::Mount;
pub use put::Put;
pub use rm_section::RmSection;
pub use root::Root;
pub use sections::Sections;
pub use touch::Touch;
pub use unmount::Unmount;
pub use version::Version;
