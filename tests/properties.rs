use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use logcentral::auth::authorization::{can_access, resolve_log_owner};
use logcentral::auth::{Identity, PasswordHasher, Role, TokenService};
use logcentral::domain::UserId;
use mockable::DefaultClock;
use proptest::prelude::*;

const SECRET: &[u8] = b"property-test-secret-0123456789abcdef";

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Developer), Just(Role::Manager)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn hash_round_trip(password in "[ -~]{1,30}", other in "[ -~]{1,30}") {
        let hasher = PasswordHasher::default();
        let credential = hasher.hash(&password).unwrap();

        prop_assert!(hasher.verify(&password, &credential.hash, &credential.salt));
        prop_assume!(other != password);
        prop_assert!(!hasher.verify(&other, &credential.hash, &credential.salt));
    }
}

proptest! {
    #[test]
    fn access_policy_truth_table(subject in 1i64..50, owner in 1i64..50, role in role()) {
        let identity = Identity::new(UserId::new(subject), "x", "x@x.com", role);
        let expected = subject == owner || role == Role::Manager;

        prop_assert_eq!(can_access(&identity, UserId::new(owner)), expected);
    }

    #[test]
    fn log_owner_only_overridden_by_managers(
        subject in 1i64..50,
        requested in proptest::option::of(1i64..50),
        role in role(),
    ) {
        let identity = Identity::new(UserId::new(subject), "x", "x@x.com", role);
        let owner = resolve_log_owner(&identity, requested.map(UserId::new));

        match (role, requested) {
            (Role::Manager, Some(requested)) => prop_assert_eq!(owner, UserId::new(requested)),
            _ => prop_assert_eq!(owner, UserId::new(subject)),
        }
    }

    #[test]
    fn tampered_token_is_rejected(subject in 1i64..1000, flip in any::<prop::sample::Index>()) {
        let tokens = TokenService::new(SECRET, 900, Arc::new(DefaultClock)).unwrap();
        let identity = Identity::new(UserId::new(subject), "x", "x@x.com", Role::Developer);
        let token = tokens.issue(&identity).unwrap();

        // Re-encode the payload with the role elevated and keep the signature.
        let parts: Vec<&str> = token.split('.').collect();
        prop_assert_eq!(parts.len(), 3);
        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let forged = String::from_utf8(payload).unwrap().replace("DEVELOPER", "MANAGER");
        let forged = URL_SAFE_NO_PAD.encode(forged);
        let forged_token = format!("{}.{}.{}", parts[0], forged, parts[2]);
        prop_assert!(tokens.validate(&forged_token).is_err());

        // Flip a single signature byte.
        let mut signature = parts[2].as_bytes().to_vec();
        let at = flip.index(signature.len() - 1);
        signature[at] = if signature[at] == b'A' { b'B' } else { b'A' };
        let signature = String::from_utf8(signature).unwrap();
        let flipped = format!("{}.{}.{}", parts[0], parts[1], signature);
        prop_assert!(tokens.validate(&flipped).is_err());
    }
}
