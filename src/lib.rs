//! An assembler for the AEGIS BrickRigs CPU.
//!
//! ```
//! let out = aegis_asm::assembler::assemble("loop: LD r3, #10\n JP loop\n").unwrap();
//! assert_eq!(out.words, vec![(0, 7310), (1, 7900)]);
//! ```

#[macro_use] extern crate log;
extern crate once_cell;
extern crate regex;

pub mod assembler;
