//! Backslash input of Sakha letters
//!
//! Typing `\` right after a base character swaps it for the Sakha letter
//! it stands in for, e.g. `у\` gives `ү`. Letters keep their case; digits
//! give an uppercase letter only while caps lock is on.

/// Sakha letter typed by `base` followed by a backslash
fn sakha_letter(base: char) -> Option<char> {
    let letter = match base {
        'е' | 'о' | '6' => 'ө',
        'у' | '8' => 'ү',
        'н' | '4' => 'ҥ',
        'ь' | '7' => 'һ',
        '5' => 'ҕ',
        _ => return None,
    };
    Some(letter)
}

/// Replace the character before a typed backslash
///
/// Returns `None` when the character has no Sakha counterpart, in which
/// case the backslash is simply not inserted.
pub fn substitute(previous: char, caps_lock: bool) -> Option<char> {
    let lower: char = previous.to_lowercase().next().unwrap_or(previous);
    let letter = sakha_letter(lower)?;

    let uppercase = if previous.is_ascii_digit() {
        caps_lock
    } else {
        previous.is_uppercase()
    };

    if uppercase {
        Some(letter.to_uppercase().next().unwrap_or(letter))
    } else {
        Some(letter)
    }
}

/// Apply every backslash in `input` as if it had been typed in order
pub fn expand_backslashes(input: &str, caps_lock: bool) -> String {
    let mut output: Vec<char> = Vec::with_capacity(input.len());

    for c in input.chars() {
        if c != '\\' {
            output.push(c);
            continue;
        }

        if let Some(last) = output.last_mut() {
            if let Some(letter) = substitute(*last, caps_lock) {
                *last = letter;
            }
        }
    }

    output.into_iter().collect()
}
