use super::*;

/// What a decoded symbol stands for once its extra bits are read.
///
/// For length and distance codes the final value is `real_value` plus the
/// next `extra_bits` raw bits of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffLeaf {
  pub symbol: u16,
  pub real_value: u16,
  pub extra_bits: u8,
}

/// The three alphabets a DEFLATE stream uses.
///
/// The alphabet decides the `real_value` and `extra_bits` stored in each
/// leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
  /// Literal bytes, end-of-block, and match lengths. Symbols `0..=287`.
  LitLen,
  /// Match distances. Symbols `0..=29` (30 and 31 can't be used).
  Dist,
  /// Code lengths for the dynamic trees. Symbols `0..=18`.
  CodeLength,
}
impl Alphabet {
  /// The leaf data for `symbol`.
  ///
  /// Length and distance values go in groups that share an extra bit count,
  /// each value in a group is the group's base plus a counter scaled by
  /// `2^extra_bits`.
  #[must_use]
  pub const fn leaf(self, symbol: u16) -> HuffLeaf {
    let (real_value, extra_bits) = match self {
      Alphabet::LitLen => match symbol {
        0..=256 => (symbol, 0),
        257..=264 => (symbol - 254, 0),
        265..=284 => {
          let extra = (symbol - 261) / 4;
          let group_base = (4 << extra) + 3;
          let counter = (symbol - 265) % 4;
          (group_base + (counter << extra), extra as u8)
        }
        285 => (258, 0),
        // 286 and 287 take part in the code but never appear in valid data.
        _ => (0, 0),
      },
      Alphabet::Dist => match symbol {
        0..=3 => (symbol + 1, 0),
        4..=29 => {
          let extra = symbol / 2 - 1;
          let group_base = (1 << (extra + 1)) + 1;
          (group_base + ((symbol % 2) << extra), extra as u8)
        }
        _ => (0, 0),
      },
      Alphabet::CodeLength => match symbol {
        16 => (3, 2),
        17 => (3, 3),
        18 => (11, 7),
        _ => (symbol, 0),
      },
    };
    HuffLeaf { symbol, real_value, extra_bits }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Child {
  #[default]
  Empty,
  Leaf(HuffLeaf),
  Node(u16),
}

#[derive(Debug, Clone, Copy, Default)]
struct Node {
  children: [Child; 2],
}

/// A binary Huffman decoding tree.
///
/// Nodes live in one arena and refer to each other by index, the root is
/// index 0. A tree with no codes has no nodes at all.
#[derive(Debug, Clone, Default)]
pub struct HuffTree {
  nodes: Vec<Node>,
}

/// Fixed literal/length code lengths.
pub(crate) const FIXED_LIT_LEN_LENGTHS: [u8; 288] = {
  let mut out = [0_u8; 288];
  let mut i = 0;
  while i < 288 {
    out[i] = match i {
      0..=143 => 8,
      144..=255 => 9,
      256..=279 => 7,
      _ => 8,
    };
    i += 1;
  }
  out
};

/// Fixed distance code lengths.
pub(crate) const FIXED_DIST_LENGTHS: [u8; 30] = [5; 30];

impl HuffTree {
  /// Builds the canonical tree for the given code lengths.
  ///
  /// `lengths[i]` is the code length of symbol `i` within `alphabet`, and 0
  /// means the symbol has no code.
  ///
  /// ## Failure
  /// * Lengths over 15, or lengths that don't form a prefix code, give
  ///   `UnsupportedFeature`.
  pub fn build(lengths: &[u8], alphabet: Alphabet) -> SplashResult<Self> {
    let mut entries: Vec<TreeEntry> = Vec::new();
    entries.try_reserve(lengths.len())?;
    entries.extend(lengths.iter().map(|&l| TreeEntry { bit_pattern: 0, bit_count: u16::from(l) }));
    TreeEntry::assign_codes(&mut entries)?;

    let mut tree = HuffTree { nodes: Vec::new() };
    let total_bits: usize = entries.iter().map(|te| usize::from(te.bit_count)).sum();
    tree.nodes.try_reserve(total_bits.min(2 * lengths.len()).max(1))?;
    for (symbol, te) in entries.iter().enumerate() {
      if te.bit_count == 0 {
        continue;
      }
      let leaf = alphabet.leaf(u16::try_from(symbol)?);
      tree.insert(*te, leaf)?;
    }
    Ok(tree)
  }

  /// The fixed literal/length tree of block type 1.
  #[inline]
  pub fn fixed_lit_len() -> SplashResult<Self> {
    Self::build(&FIXED_LIT_LEN_LENGTHS, Alphabet::LitLen)
  }

  /// The fixed distance tree of block type 1.
  #[inline]
  pub fn fixed_dist() -> SplashResult<Self> {
    Self::build(&FIXED_DIST_LENGTHS, Alphabet::Dist)
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  fn new_node(&mut self) -> SplashResult<u16> {
    let id = u16::try_from(self.nodes.len()).map_err(|_| SplashError::UnsupportedFeature)?;
    self.nodes.try_reserve(1)?;
    self.nodes.push(Node::default());
    Ok(id)
  }

  /// Walks the code's bits from the most significant end, making nodes as
  /// needed, and puts the leaf at the end of the path.
  fn insert(&mut self, te: TreeEntry, leaf: HuffLeaf) -> SplashResult<()> {
    if self.nodes.is_empty() {
      self.new_node()?;
    }
    let mut current = 0_usize;
    for shift in (0..te.bit_count).rev() {
      let bit = usize::from((te.bit_pattern >> shift) & 1);
      let is_last = shift == 0;
      match self.nodes[current].children[bit] {
        Child::Empty if is_last => {
          self.nodes[current].children[bit] = Child::Leaf(leaf);
        }
        Child::Empty => {
          let id = self.new_node()?;
          self.nodes[current].children[bit] = Child::Node(id);
          current = usize::from(id);
        }
        Child::Node(id) if !is_last => current = usize::from(id),
        // a code that lands on or passes through another code
        _ => return Err(SplashError::UnsupportedFeature),
      }
    }
    Ok(())
  }

  /// Decodes one symbol, one bit per tree level starting at the root.
  ///
  /// ## Failure
  /// * Bits that lead off the tree (including any bit at all for an empty
  ///   tree) give `UnsupportedFeature`.
  pub fn decode(&self, bits: &mut BitSource<'_>) -> SplashResult<HuffLeaf> {
    let mut node = self.nodes.first().ok_or(SplashError::UnsupportedFeature)?;
    loop {
      let bit = bits.read_bit()? as usize;
      match node.children[bit] {
        Child::Leaf(leaf) => return Ok(leaf),
        Child::Node(id) => {
          node = self.nodes.get(usize::from(id)).ok_or(SplashError::UnsupportedFeature)?;
        }
        Child::Empty => return Err(SplashError::UnsupportedFeature),
      }
    }
  }
}
