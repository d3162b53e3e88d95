/// Name used in the generated file header.
pub const APP_NAME: &str = "kernmake";

/// Config file looked up in the project directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "kernmake.toml";

pub const DEFAULT_SOURCE_DIR: &str = "src";
pub const DEFAULT_OBJECTS_DIR: &str = "objects";
pub const DEFAULT_LIBS_DIR: &str = "lib";
pub const DEFAULT_IMAGE: &str = "kernel.exe";
pub const DEFAULT_MAKEFILE: &str = "Makefile";
pub const DEFAULT_ENTRY: &str = "kmain";
pub const DEFAULT_BASE_ADDRESS: &str = "0xffff800000000000";

/// Make variable holding the objects directory.
pub const OBJECTS_DIR_VAR: &str = "OBJECTSDIR";

/// Make variable holding the libraries directory.
pub const LIBS_DIR_VAR: &str = "LIBSDIR";

/// Binding prefix for sources living directly under the source root.
///
/// Module bindings use a lower-case suffix (`foo_csources`) while root bindings
/// are fully upper-case (`ROOT_CSOURCES`), so the two namespaces never overlap.
pub const ROOT_BINDING_PREFIX: &str = "ROOT";
