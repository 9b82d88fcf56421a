//! Command-line validation: the depot's name plus its seeded goods.

use depot_core::validate::{parse_seed_qty, valid_name};

/// A validated invocation.
#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub seeds: Vec<(String, i32)>,
}

/// Startup-fatal argument errors. The display text is the exact stderr
/// diagnostic; the exit code is fixed per variant.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("Usage: depotd name {{goods qty}}")]
    Usage,
    #[error("Invalid name(s)")]
    InvalidName,
    #[error("Invalid quantity")]
    InvalidQuantity,
}

impl UsageError {
    pub fn exit_code(&self) -> i32 {
        match self {
            UsageError::Usage => 1,
            UsageError::InvalidName => 2,
            UsageError::InvalidQuantity => 3,
        }
    }
}

/// Validate the argument list (program name already stripped). Goods come
/// in `<good> <qty>` pairs; an odd tail is a usage error.
pub fn parse<I>(mut args: I) -> Result<Invocation, UsageError>
where
    I: Iterator<Item = String>,
{
    let name = args.next().ok_or(UsageError::Usage)?;
    if name.is_empty() {
        return Err(UsageError::Usage);
    }
    if !valid_name(&name) {
        return Err(UsageError::InvalidName);
    }

    let rest: Vec<String> = args.collect();
    if rest.len() % 2 != 0 {
        return Err(UsageError::Usage);
    }

    let mut seeds = Vec::with_capacity(rest.len() / 2);
    for pair in rest.chunks(2) {
        if !valid_name(&pair[0]) {
            return Err(UsageError::InvalidName);
        }
        let qty = parse_seed_qty(&pair[1]).ok_or(UsageError::InvalidQuantity)?;
        seeds.push((pair[0].clone(), qty));
    }

    Ok(Invocation { name, seeds })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Result<Invocation, UsageError> {
        parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn name_alone_is_enough() {
        let inv = run(&["alpha"]).unwrap();
        assert_eq!(inv.name, "alpha");
        assert!(inv.seeds.is_empty());
    }

    #[test]
    fn seed_pairs_are_collected_in_order() {
        let inv = run(&["alpha", "milk", "5", "bread", "0"]).unwrap();
        assert_eq!(
            inv.seeds,
            [("milk".to_owned(), 5), ("bread".to_owned(), 0)]
        );
    }

    #[test]
    fn missing_or_empty_name_is_usage() {
        assert_eq!(run(&[]), Err(UsageError::Usage));
        assert_eq!(run(&[""]), Err(UsageError::Usage));
    }

    #[test]
    fn odd_seed_tokens_are_usage() {
        assert_eq!(run(&["alpha", "milk"]), Err(UsageError::Usage));
        assert_eq!(run(&["alpha", "milk", "5", "bread"]), Err(UsageError::Usage));
    }

    #[test]
    fn bad_names_are_rejected() {
        assert_eq!(run(&["al:pha"]), Err(UsageError::InvalidName));
        assert_eq!(run(&["alpha", "mi lk", "5"]), Err(UsageError::InvalidName));
    }

    #[test]
    fn bad_quantities_are_rejected() {
        assert_eq!(run(&["alpha", "milk", "x"]), Err(UsageError::InvalidQuantity));
        assert_eq!(
            run(&["alpha", "milk", "-1"]),
            Err(UsageError::InvalidQuantity)
        );
        assert_eq!(
            run(&["alpha", "milk", "+1"]),
            Err(UsageError::InvalidQuantity)
        );
    }

    #[test]
    fn exit_codes_are_fixed() {
        assert_eq!(UsageError::Usage.exit_code(), 1);
        assert_eq!(UsageError::InvalidName.exit_code(), 2);
        assert_eq!(UsageError::InvalidQuantity.exit_code(), 3);
    }
}
