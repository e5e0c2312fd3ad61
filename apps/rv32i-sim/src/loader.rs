//! Hex program-image loading.
//!
//! An image is a text stream with one hexadecimal 32-bit word per line.
//! Words are packed little-endian into memory, 4 bytes per line, in the
//! order read.

use anyhow::{anyhow, bail, Result};
use nom::{
    bytes::complete::take_while1,
    character::complete::space0,
    combinator::map_res,
    sequence::preceded,
    IResult,
};
use rv32i_emulator::Memory;

/// Parse one image line: optional leading whitespace, then a hex word.
fn hex_word(input: &str) -> IResult<&str, u32> {
    preceded(
        space0,
        map_res(take_while1(|c: char| c.is_ascii_hexdigit()), |s: &str| {
            u32::from_str_radix(s, 16)
        }),
    )(input)
}

/// Load a text image into memory starting at `base`.
///
/// Blank lines are skipped; malformed lines and words falling outside the
/// arena are load errors. Returns the number of words loaded.
pub fn load_image(memory: &mut Memory, base: u32, text: &str) -> Result<u32> {
    let mut count = 0u32;
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (rest, word) = hex_word(line)
            .map_err(|_| anyhow!("line {}: expected a hex word, got {:?}", line_no + 1, line))?;
        if !rest.trim().is_empty() {
            bail!(
                "line {}: trailing characters after hex word: {:?}",
                line_no + 1,
                rest.trim()
            );
        }
        let address = base + count * 4;
        memory
            .store_word(address, word)
            .map_err(|e| anyhow!("line {}: {}", line_no + 1, e))?;
        count += 1;
    }
    Ok(count)
}
