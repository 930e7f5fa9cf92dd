//! Source collections that `import` splices into a program.

const COUNTER: &str = "
block counter8(clock reset) {
    let c1 = tflipflop(clock 1 0 reset)

    let toggle_c2 = c1
    let c2 = tflipflop(clock toggle_c2 0 reset)

    let toggle_c4 = (c1 and c2)
    let c4 = tflipflop(clock toggle_c4 0 reset)

    let toggle_c8 = ((c1 and c2) and c4)
    let c8 = tflipflop(clock toggle_c8 0 reset)

    return c1 c2 c4 c8
}
";

const ADDER: &str = "
block halfadder(a b) {
    let sum = ((a and (not b)) or ((not a) and b))
    let carry = (a and b)
    return sum carry
}

block adder(a b c) {
    let sum1 carry1 = halfadder(a b)
    let sum2 carry2 = halfadder(sum1 c)

    let carry = (carry1 or carry2)
    return sum2 carry
}

block adder4(a0 a1 a2 a3 b0 b1 b2 b3) {
    let sum1 carry1 = adder(a0 b0 0)
    let sum2 carry2 = adder(a1 b1 carry1)
    let sum4 carry4 = adder(a2 b2 carry2)
    let sum8 overflow = adder(a3 b3 carry4)

    return sum1 sum2 sum4 sum8 overflow
}

// Two's complement of a 4-bit value, computed as ~a + 1.
block twoscomplement4(a0 a1 a2 a3) {
    let b0 b1 b2 b3 _ = adder4(
        (not a0) (not a1) (not a2) (not a3)
        1        0        0        0
    )
    return b0 b1 b2 b3
}
";

const LATCH: &str = "
block srlatch(s r) {
    let q = (not (r or nq))
    let nq = (not (s or q))
    return q
}

block srlatch2(s r) {
    let q = (not (r or nq))
    let nq = (not (s or q))
    return q nq
}

block dlatch(clock d) {
    let s r = (clock and d) (clock and (not d))
    let q = (not (r or nq))
    let nq = (not (s or q))
    return q
}

block dlatch2(clock d) {
    let s r = (clock and d) (clock and (not d))
    let q = (not (r or nq))
    let nq = (not (s or q))
    return q nq
}
";

pub const COLLECTIONS: [(&str, &str); 3] = [("counter", COUNTER), ("adder", ADDER), ("latch", LATCH)];

/// Whether `path` has the shape of a standard library name rather than a filesystem path.
pub fn is_library_name(path: &str) -> bool {
    !path.is_empty() && path.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
}

pub fn lookup(name: &str) -> Option<&'static str> {
    COLLECTIONS.iter().find(|(collection, _)| *collection == name).map(|(_, source)| *source)
}
