//! The daily-prompt rotation. Posts that answer no prompt carry the
//! free-form sentinel instead (`lovewall_shared::FREEFORM_PROMPT`).

pub const PROMPTS: [&str; 5] = [
    "What's your dream date?",
    "Define love in one word.",
    "The cheesiest pickup line you actually like?",
    "What song reminds you of love?",
    "First thing you notice in a crush?",
];

/// The prompt after `current`, wrapping around. Unknown prompts restart
/// the rotation.
pub fn next_prompt(current: &str) -> &'static str {
    let idx = PROMPTS.iter().position(|p| *p == current);
    match idx {
        Some(i) => PROMPTS[(i + 1) % PROMPTS.len()],
        None => PROMPTS[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps() {
        let mut p = PROMPTS[0];
        for _ in 0..PROMPTS.len() {
            p = next_prompt(p);
        }
        assert_eq!(p, PROMPTS[0]);
    }

    #[test]
    fn unknown_prompt_restarts() {
        assert_eq!(next_prompt("who are you?"), PROMPTS[0]);
    }
}
