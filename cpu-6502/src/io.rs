//! File I/O helpers: reading assembly source text, and reading/writing the
//! raw binary image format described alongside the encoder. Nothing here
//! does bounds checking beyond what `std::fs` already gives us; a missing or
//! unreadable file is just an `io::Error` bubbled up to the caller.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::memory::Memory;

/// Reads the full UTF-8 contents of a source file. No BOM handling.
pub fn read_source(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Writes a contiguous byte image as-is; no header, no checksum.
pub fn write_binary(path: &Path, image: &[u8]) -> io::Result<()> {
    fs::write(path, image)
}

/// Reads a raw binary image back off disk, for `emulator-cli` to load.
pub fn read_binary(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
}

/// Copies `bytes` into memory starting at `base_address`. The caller is
/// responsible for the range fitting in the 64 KiB address space.
pub fn load_bytes_into_memory(mem: &mut Memory, base_address: u16, bytes: &[u8]) {
    mem.load(base_address, bytes);
}

/// Loads an address -> bytes table (as produced by `crate::demo`, or read
/// back from some other source) into memory, one entry at a time.
pub fn load_table_into_memory(mem: &mut Memory, table: &BTreeMap<u16, Vec<u8>>) {
    mem.load_table(table);
}

/// Replaces the extension of `source` with `.bin`, matching the assembler
/// CLI's default output filename when `-o` is not given.
pub fn default_output_path(source: &Path) -> std::path::PathBuf {
    source.with_extension("bin")
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn default_output_path_swaps_the_extension() {
        let source = Path::new("program.s");
        assert_eq!(default_output_path(source), Path::new("program.bin"));
    }

    #[test]
    fn default_output_path_handles_no_extension() {
        let source = Path::new("program");
        assert_eq!(default_output_path(source), Path::new("program.bin"));
    }

    #[test]
    fn load_table_into_memory_copies_every_entry() {
        let mut table = BTreeMap::new();
        table.insert(0x0200, vec![0xA9, 0x10]);
        table.insert(0xFFFC, vec![0x00, 0x20]);

        let mut mem = Memory::new();
        load_table_into_memory(&mut mem, &table);

        assert_eq!(mem.read(0x0200), 0xA9);
        assert_eq!(mem.read(0x0201), 0x10);
        assert_eq!(mem.read_word(0xFFFC), 0x2000);
    }

    #[test]
    fn binary_round_trips_through_a_temp_file() {
        let mut path = std::env::temp_dir();
        path.push("cpu_6502_io_test.bin");
        let image = vec![0xA9, 0x42, 0x60];

        write_binary(&path, &image).unwrap();
        let read_back = read_binary(&path).unwrap();
        assert_eq!(read_back, image);

        let _ = fs::remove_file(&path);
    }
}
