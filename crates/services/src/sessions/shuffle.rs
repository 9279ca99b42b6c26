use rand::Rng;

//
// ─── SHUFFLING ─────────────────────────────────────────────────────────────────
//

/// Returns a uniformly random permutation of `items`, leaving the source
/// untouched.
///
/// Fisher-Yates over a clone: each index from the back swaps with a uniform
/// draw from `[0, i]`. Empty and singleton inputs come back unchanged. The
/// random source is a parameter so callers can seed it and reproduce a
/// permutation exactly.
#[must_use]
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.random_range(0..=i);
        out.swap(i, j);
    }
    out
}

//
// ─── ANSWER ORDER ──────────────────────────────────────────────────────────────
//

/// A question's options in presentation order.
///
/// Derived exactly once per question becoming current; re-deriving on every
/// render would move the correct answer mid-interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffledQuestion {
    options: Vec<String>,
    correct_index: usize,
}

impl ShuffledQuestion {
    /// Option texts in the order they are presented.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Position of the correct answer within `options`.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }
}

/// Shuffles one question's options, tracking where the correct answer lands.
///
/// Shuffles an index array rather than the texts so the new position of
/// `correct_index` falls out of the permutation directly.
#[must_use]
pub fn shuffle_answers<R: Rng + ?Sized>(
    options: &[String],
    correct_index: usize,
    rng: &mut R,
) -> ShuffledQuestion {
    let indices: Vec<usize> = (0..options.len()).collect();
    let indices = shuffled(&indices, rng);

    let shuffled_options: Vec<String> = indices.iter().map(|&i| options[i].clone()).collect();
    // `indices` is a permutation of 0..len, so a valid original index is
    // always found.
    let correct = indices
        .iter()
        .position(|&i| i == correct_index)
        .unwrap_or(correct_index);

    ShuffledQuestion {
        options: shuffled_options,
        correct_index: correct,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
