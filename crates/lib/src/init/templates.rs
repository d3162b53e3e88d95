/// Commented template written by `kernmake init`.
pub const CONFIG_TEMPLATE: &str = r#"# kernmake configuration. Every key is optional.

[layout]
source_dir = "src"
objects_dir = "objects"
libs_dir = "lib"
image = "kernel.exe"
# Top-level source directories that are not modules.
exclude = ["include"]

[toolchain]
# efi-clang | elf-clang | elf-gcc
profile = "efi-clang"
entry = "kmain"
base_address = "0xffff800000000000"
# linker_script = "linker.ld"
# debug | size | speed | fast
optimize = "fast"
sse = false
include_dirs = ["include", "../bootloader/include/efi"]
defines = ["__EFI_STANDALONE__"]

[make]
output = "Makefile"
# posix | windows
shell = "posix"
"#;
