use failure::{bail, Error};

/// Consumes the results and returns `Ok(())` if none of them failed.
///
/// A single failure is returned as is, multiple failures are folded
/// into one error listing all of them.
pub fn compound_result<I, E, O>(results: I) -> Result<(), Error>
where
    I: IntoIterator<Item = Result<O, E>>,
    E: Into<Error>,
{
    let mut errors: Vec<Error> = results
        .into_iter()
        .filter_map(Result::err)
        .map(Into::into)
        .collect();

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => {
            let listing: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            bail!("Multiple errors: {}", listing.join("; "))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use failure::format_err;

    #[test]
    fn all_ok_is_ok() {
        let results: Vec<Result<(), Error>> = vec![Ok(()), Ok(())];

        assert!(compound_result(results).is_ok());
    }

    #[test]
    fn single_failure_is_kept() {
        let results = vec![Ok(()), Err(format_err!("disk full"))];

        let err = compound_result(results).unwrap_err();

        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn multiple_failures_are_listed() {
        let results: Vec<Result<(), Error>> =
            vec![Err(format_err!("first")), Ok(()), Err(format_err!("second"))];

        let err = compound_result(results).unwrap_err().to_string();

        assert!(err.contains("first") && err.contains("second"), "{}", err);
    }
}
