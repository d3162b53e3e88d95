//! Toolchain profiles.
//!
//! A profile fixes the compilers, archiver and link driver for one target
//! ABI. [`Toolchain::resolve`] combines it with the per-project knobs
//! (entry symbol, load address, optimization, include paths) into the flag
//! sets embedded in the generated rules.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::ToolchainConfig;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKind {
  /// clang targeting the UEFI/PE ABI, linked by lld-link at a fixed base.
  #[default]
  EfiClang,
  /// clang targeting bare-metal ELF, linked by ld.lld.
  ElfClang,
  /// An `x86_64-elf` GCC cross toolchain.
  ElfGcc,
}

impl ProfileKind {
  pub const ALL: [ProfileKind; 3] = [ProfileKind::EfiClang, ProfileKind::ElfClang, ProfileKind::ElfGcc];

  pub fn as_str(self) -> &'static str {
    match self {
      ProfileKind::EfiClang => "efi-clang",
      ProfileKind::ElfClang => "elf-clang",
      ProfileKind::ElfGcc => "elf-gcc",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      ProfileKind::EfiClang => "clang/lld-link, PE32+ EFI application at a fixed base, archives named <module>.lib",
      ProfileKind::ElfClang => "clang/ld.lld, static non-PIE ELF, archives named lib<module>.a",
      ProfileKind::ElfGcc => "x86_64-elf-gcc cross toolchain, static non-PIE ELF, archives named lib<module>.a",
    }
  }

  /// Whether the link driver honors a linker script.
  pub fn supports_linker_script(self) -> bool {
    !matches!(self, ProfileKind::EfiClang)
  }
}

impl std::fmt::Display for ProfileKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
#[error("unknown profile '{0}' (expected one of: efi-clang, elf-clang, elf-gcc)")]
pub struct UnknownProfile(pub String);

impl FromStr for ProfileKind {
  type Err = UnknownProfile;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ProfileKind::ALL
      .into_iter()
      .find(|p| p.as_str() == s)
      .ok_or_else(|| UnknownProfile(s.to_string()))
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptLevel {
  Debug,
  Size,
  Speed,
  #[default]
  Fast,
}

impl OptLevel {
  fn flags(self) -> &'static [&'static str] {
    match self {
      OptLevel::Debug => &["-O0", "-g"],
      OptLevel::Size => &["-Os"],
      OptLevel::Speed => &["-O2"],
      OptLevel::Fast => &["-Ofast"],
    }
  }
}

/// Resolved tool commands and flag sets for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
  pub profile: ProfileKind,
  /// Non-linking C compiler invocation.
  pub cc: String,
  /// Non-linking C++ compiler invocation.
  pub cxx: String,
  pub asm: String,
  /// Archiver in create/replace mode.
  pub ar: String,
  /// Link driver, including entry and placement flags.
  pub link: String,
  pub cflags: Vec<String>,
  pub cxxflags: Vec<String>,
  pub asmflags: Vec<String>,
  pub optflags: Vec<String>,
  pub ldflags: Vec<String>,
  #[serde(skip)]
  archive_prefix: &'static str,
  #[serde(skip)]
  archive_suffix: &'static str,
}

impl Toolchain {
  pub fn resolve(config: &ToolchainConfig) -> Self {
    let profile = config.profile;
    let entry = &config.entry;

    let (target, cc, cxx, asm, ar) = match profile {
      ProfileKind::EfiClang => (
        Some("x86_64-unknown-windows"),
        "clang",
        "clang++",
        "nasm -fwin64",
        "ar -cr",
      ),
      ProfileKind::ElfClang => (
        Some("x86_64-unknown-none-elf"),
        "clang",
        "clang++",
        "nasm -felf64",
        "llvm-ar -rcs",
      ),
      ProfileKind::ElfGcc => (None, "x86_64-elf-gcc", "x86_64-elf-g++", "nasm -felf64", "x86_64-elf-ar -rcs"),
    };
    let with_target = |tool: &str| match target {
      Some(triple) => format!("{} -target {}", tool, triple),
      None => tool.to_string(),
    };
    let cc = with_target(cc);
    let cxx = with_target(cxx);

    let mut link = vec![cxx.clone()];
    match profile {
      ProfileKind::EfiClang => {
        link.push("-fuse-ld=lld".into());
        link.push("-Wl,-subsystem:efi_application".into());
        link.push(format!("-Wl,-entry:{}", entry));
        if config.linker_script.is_some() {
          warn!(profile = %profile, "linker script is not supported by this profile, ignoring");
        }
        if let Some(base) = &config.base_address {
          link.push(format!("-Wl,-FIXED,-BASE:{}", base));
        }
      }
      ProfileKind::ElfClang | ProfileKind::ElfGcc => {
        if profile == ProfileKind::ElfClang {
          link.push("-fuse-ld=lld".into());
        }
        link.push(format!("-Wl,-e,{}", entry));
        if let Some(script) = &config.linker_script {
          link.push(format!("-T {}", script));
        } else if let Some(base) = &config.base_address {
          link.push(match profile {
            ProfileKind::ElfClang => format!("-Wl,--image-base={}", base),
            _ => format!("-Wl,-Ttext={}", base),
          });
        }
      }
    }

    let mut profile_flags: Vec<String> = Vec::new();
    match profile {
      ProfileKind::EfiClang => {
        profile_flags.push("-fms-extensions".into());
        profile_flags.push("-Wno-microsoft-anon-tag".into());
      }
      ProfileKind::ElfClang | ProfileKind::ElfGcc => profile_flags.push("-fno-pic".into()),
    }

    let freestanding = ["-mno-red-zone", "-ffreestanding", "-nostdlib"].map(String::from);
    let includes = config.include_dirs.iter().map(|dir| format!("-I{}", dir));
    let defines = config.defines.iter().map(|def| format!("-D{}", def));
    let tail: Vec<String> = freestanding.into_iter().chain(includes).chain(defines).collect();

    let mut cflags: Vec<String> = ["-std=c23", "-Wall", "-Wextra", "-Wpedantic"].map(String::from).into();
    cflags.extend(profile_flags.iter().cloned());
    cflags.extend(tail.iter().cloned());

    let mut cxxflags: Vec<String> = ["-std=c++23", "-Wall", "-Wextra", "-fno-exceptions", "-fno-rtti"]
      .map(String::from)
      .into();
    cxxflags.extend(profile_flags);
    cxxflags.extend(tail);

    let mut optflags: Vec<String> = config.optimize.flags().iter().map(|f| f.to_string()).collect();
    if !config.sse {
      optflags.push("-mno-sse".into());
    }

    let ldflags: Vec<String> = match profile {
      ProfileKind::EfiClang => vec!["-nostdlib".into(), "-ffreestanding".into()],
      ProfileKind::ElfClang | ProfileKind::ElfGcc => {
        vec!["-static".into(), "-nostdlib".into(), "-no-pie".into(), "-ffreestanding".into()]
      }
    };

    let (archive_prefix, archive_suffix) = match profile {
      ProfileKind::EfiClang => ("", ".lib"),
      ProfileKind::ElfClang | ProfileKind::ElfGcc => ("lib", ".a"),
    };

    Self {
      profile,
      cc,
      cxx,
      asm: asm.to_string(),
      ar: ar.to_string(),
      link: link.join(" "),
      cflags,
      cxxflags,
      asmflags: Vec::new(),
      optflags,
      ldflags,
      archive_prefix,
      archive_suffix,
    }
  }

  /// File name of the static library built from `module`.
  pub fn archive_name(&self, module: &str) -> String {
    format!("{}{}{}", self.archive_prefix, module, self.archive_suffix)
  }

  /// Link-driver argument that pulls in the library of `module`.
  pub fn library_arg(&self, module: &str) -> String {
    format!("-l{}", module)
  }
}
