use super::*;

/// The order the code length code lengths are stored in.
const CODE_LENGTH_ORDER: [usize; 19] =
  [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// Most literal/length codes a block header can declare (HLIT is 5 bits).
const MAX_LIT_LEN_CODES: usize = 257 + 31;
/// Most distance codes a block header can declare (HDIST is 5 bits).
const MAX_DIST_CODES: usize = 1 + 31;

/// Reads a dynamic block's header and builds its literal/length and distance
/// trees.
///
/// The code length tree only lives for the duration of this call.
pub(crate) fn read_dynamic_trees(bits: &mut BitSource<'_>) -> SplashResult<(HuffTree, HuffTree)> {
  let hlit = bits.read_bits(5)? as usize + 257;
  let hdist = bits.read_bits(5)? as usize + 1;
  let hclen = bits.read_bits(4)? as usize + 4;
  log::trace!("inflate: dynamic block hlit={hlit} hdist={hdist} hclen={hclen}");

  let mut cl_lengths = [0_u8; 19];
  for &i in CODE_LENGTH_ORDER.iter().take(hclen) {
    cl_lengths[i] = bits.read_bits(3)? as u8;
  }
  let cl_tree = HuffTree::build(&cl_lengths, Alphabet::CodeLength)?;

  let total = hlit + hdist;
  let mut lengths = [0_u8; MAX_LIT_LEN_CODES + MAX_DIST_CODES];
  fill_code_lengths(&cl_tree, &mut lengths[..total], bits)?;

  let lit_len = HuffTree::build(&lengths[..hlit], Alphabet::LitLen)?;
  let dist = HuffTree::build(&lengths[hlit..total], Alphabet::Dist)?;
  Ok((lit_len, dist))
}

/// Decodes exactly `lengths.len()` code lengths with the code length tree.
///
/// ## Failure
/// * A repeat code that would run past the end of `lengths`, or a "repeat
///   previous" code with no previous length, gives `InvalidLength`.
fn fill_code_lengths(
  cl_tree: &HuffTree, lengths: &mut [u8], bits: &mut BitSource<'_>,
) -> SplashResult<()> {
  let mut acquired = 0_usize;
  while acquired < lengths.len() {
    let leaf = cl_tree.decode(bits)?;
    match leaf.symbol {
      0..=15 => {
        lengths[acquired] = leaf.symbol as u8;
        acquired += 1;
      }
      16..=18 => {
        let repeat_count =
          usize::from(leaf.real_value) + bits.read_bits(u32::from(leaf.extra_bits))? as usize;
        let value = if leaf.symbol == 16 {
          // repeat the previous length 3 to 6 times
          *acquired.checked_sub(1).and_then(|i| lengths.get(i)).ok_or(SplashError::InvalidLength)?
        } else {
          // 17 is 3 to 10 zeroes, 18 is 11 to 138 zeroes
          0
        };
        let run =
          lengths.get_mut(acquired..acquired + repeat_count).ok_or(SplashError::InvalidLength)?;
        run.fill(value);
        acquired += repeat_count;
      }
      _ => return Err(SplashError::UnsupportedFeature),
    }
  }
  Ok(())
}
