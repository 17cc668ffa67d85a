use warp::{Filter, Rejection};

use crate::auth::token::TokenService;
use crate::error::AppError;

/// Resolve an `Authorization` header value to the token subject
pub fn authenticate(header: Option<&str>, tokens: &TokenService) -> Result<String, AppError> {
    let header = header.ok_or(AppError::Unauthenticated)?;

    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AppError::Unauthenticated)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthenticated);
    }

    Ok(tokens.resolve_token(token.trim())?)
}

/// Filter extracting the authenticated username from a bearer token
pub fn with_auth(
    tokens: TokenService,
) -> impl Filter<Extract = (String,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let tokens = tokens.clone();
        async move { authenticate(header.as_deref(), &tokens).map_err(Rejection::from) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tokens() -> TokenService {
        TokenService::new(vec![7u8; 32], Duration::from_secs(300)).unwrap()
    }

    #[test]
    fn test_bearer_header_resolves_subject() {
        let tokens = tokens();
        let token = tokens.issue_token("admin").unwrap();
        let header = format!("Bearer {}", token);

        assert_eq!(authenticate(Some(&header), &tokens).unwrap(), "admin");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let tokens = tokens();
        let header = format!("bearer {}", tokens.issue_token("admin").unwrap());
        assert!(authenticate(Some(&header), &tokens).is_ok());
    }

    #[test]
    fn test_missing_or_malformed_header_is_unauthenticated() {
        let tokens = tokens();
        assert!(matches!(
            authenticate(None, &tokens),
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            authenticate(Some("Basic YWRtaW46YWRtaW4="), &tokens),
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            authenticate(Some("Bearer"), &tokens),
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            authenticate(Some("Bearer abc.def"), &tokens),
            Err(AppError::Unauthenticated)
        ));
    }
}
