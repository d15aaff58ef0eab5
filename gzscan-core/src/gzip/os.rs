//! Operating system identifiers of the gzip `OS` header byte (RFC 1952).

pub const MAX_OS_CODE: u8 = 13;

const OS_NAMES: [&str; MAX_OS_CODE as usize + 1] = [
    "FAT filesystem (MS-DOS, OS/2, NT/Win32)",
    "Amiga",
    "VMS (or OpenVMS)",
    "Unix",
    "VM/CMS",
    "Atari TOS",
    "HPFS filesystem (OS/2, NT)",
    "Macintosh",
    "Z-System",
    "CP/M",
    "TOPS-20",
    "NTFS filesystem (NT)",
    "QDOS",
    "Acorn RISCOS",
];

pub fn os_name(code: u8) -> &'static str {
    OS_NAMES.get(code as usize).copied().unwrap_or("unknown")
}
