//! Capability assignment.
//!
//! Derives a role's default capability set and validates manual overrides.
//! Overrides that include a restricted capability are rejected, never
//! silently stripped: the UI disables those controls, but that is not a
//! security boundary.

use wf_common::{Capabilities, User};

use crate::policy::{PolicyError, ValidationError};
use crate::roles::{RoleHierarchy, UnknownRole};

/// `(baseline ∪ landing page) \ restricted(role)`.
///
/// The landing page survives because the role table loader refuses any
/// role that restricts it.
pub fn default_capabilities(
    roles: &RoleHierarchy,
    role_id: &str,
    baseline: Capabilities,
) -> Result<Capabilities, UnknownRole> {
    let restricted = roles.restricted_capabilities(role_id)?;
    Ok((baseline | Capabilities::LANDING_PAGE) - restricted)
}

/// Accept `proposed` unchanged, or reject it if it touches the restricted set.
pub fn validate_override(
    roles: &RoleHierarchy,
    role_id: &str,
    proposed: Capabilities,
) -> Result<Capabilities, PolicyError> {
    let forbidden = proposed & roles.restricted_capabilities(role_id)?;
    if forbidden.is_empty() {
        Ok(proposed)
    } else {
        Err(ValidationError::RestrictedCapabilities {
            role: role_id.to_string(),
            capabilities: forbidden,
        }
        .into())
    }
}

/// Write-path helper: validate an explicit set, or derive the defaults.
pub fn resolve(
    roles: &RoleHierarchy,
    role_id: &str,
    proposed: Option<Capabilities>,
    baseline: Capabilities,
) -> Result<Capabilities, PolicyError> {
    match proposed {
        Some(caps) => validate_override(roles, role_id, caps),
        None => Ok(default_capabilities(roles, role_id, baseline)?),
    }
}

/// Check an existing record against its role: the role must be known and
/// the stored set must avoid the role's restrictions.
pub fn validate_user(roles: &RoleHierarchy, user: &User) -> Result<(), PolicyError> {
    validate_override(roles, &user.role, user.capabilities).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_never_intersect_restricted() {
        let roles = RoleHierarchy::builtin();
        for role in roles.roles() {
            for bits in 0..=Capabilities::all().bits() {
                let baseline = Capabilities::from_bits_truncate(bits);
                let caps = default_capabilities(&roles, &role.id, baseline).unwrap();
                assert!(
                    !caps.intersects(role.restricted_capabilities),
                    "{} with baseline {:?}",
                    role.id,
                    baseline
                );
                assert!(caps.contains(Capabilities::LANDING_PAGE));
            }
        }
    }

    #[test]
    fn test_defaults_add_landing_page_to_empty_baseline() {
        let roles = RoleHierarchy::builtin();
        let caps = default_capabilities(&roles, "osm", Capabilities::empty()).unwrap();
        assert_eq!(caps, Capabilities::DASHBOARD);
    }

    #[test]
    fn test_defaults_strip_restricted_from_full_baseline() {
        let roles = RoleHierarchy::builtin();
        let caps = default_capabilities(&roles, "osm", Capabilities::all()).unwrap();
        assert!(!caps.contains(Capabilities::USER_MANAGEMENT));
        assert!(!caps.contains(Capabilities::APPROVALS));
        assert!(!caps.contains(Capabilities::SETTINGS));
        assert!(caps.contains(Capabilities::INCENTIVES));
    }

    #[test]
    fn test_defaults_unknown_role() {
        let roles = RoleHierarchy::builtin();
        assert!(default_capabilities(&roles, "ghost", Capabilities::all()).is_err());
    }

    #[test]
    fn test_override_rejected_iff_intersecting() {
        let roles = RoleHierarchy::builtin();
        for role in roles.roles() {
            for bits in 0..=Capabilities::all().bits() {
                let proposed = Capabilities::from_bits_truncate(bits);
                let result = validate_override(&roles, &role.id, proposed);
                if proposed.intersects(role.restricted_capabilities) {
                    assert!(
                        matches!(result, Err(PolicyError::Validation(_))),
                        "{} should reject {:?}",
                        role.id,
                        proposed
                    );
                } else {
                    assert_eq!(result.unwrap(), proposed, "{} should echo", role.id);
                }
            }
        }
    }

    #[test]
    fn test_override_reports_only_offending_capabilities() {
        let roles = RoleHierarchy::builtin();
        let proposed = Capabilities::DASHBOARD | Capabilities::SETTINGS | Capabilities::REPORTS;
        let err = validate_override(&roles, "compliance", proposed).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::Validation(ValidationError::RestrictedCapabilities { capabilities, .. })
                if capabilities == Capabilities::SETTINGS
        ));
    }

    #[test]
    fn test_override_does_not_force_landing_page() {
        let roles = RoleHierarchy::builtin();
        let proposed = Capabilities::REPORTS;
        assert_eq!(validate_override(&roles, "osm", proposed).unwrap(), proposed);
    }

    #[test]
    fn test_override_unknown_role() {
        let roles = RoleHierarchy::builtin();
        let result = validate_override(&roles, "ghost", Capabilities::empty());
        assert!(matches!(result, Err(PolicyError::UnknownRole(_))));
    }

    #[test]
    fn test_resolve_picks_path() {
        let roles = RoleHierarchy::builtin();
        let derived = resolve(&roles, "compliance", None, Capabilities::all()).unwrap();
        assert_eq!(derived, Capabilities::all() - Capabilities::SETTINGS);

        let explicit = resolve(
            &roles,
            "compliance",
            Some(Capabilities::DASHBOARD | Capabilities::REPORTS),
            Capabilities::all(),
        )
        .unwrap();
        assert_eq!(explicit, Capabilities::DASHBOARD | Capabilities::REPORTS);

        assert!(resolve(&roles, "compliance", Some(Capabilities::SETTINGS), Capabilities::all()).is_err());
    }

    fn stored_user(role: &str, capabilities: Capabilities) -> User {
        User {
            id: uuid::Uuid::new_v4(),
            first_name: "Rita".to_string(),
            last_name: "Example".to_string(),
            email: "rita@example.com".to_string(),
            role: role.to_string(),
            capabilities,
            deletion_request_state: wf_common::DeletionRequestState::None,
        }
    }

    #[test]
    fn test_validate_user() {
        let roles = RoleHierarchy::builtin();

        assert!(validate_user(&roles, &stored_user("osm", Capabilities::DASHBOARD)).is_ok());

        let restricted = stored_user("osm", Capabilities::DASHBOARD | Capabilities::APPROVALS);
        assert!(matches!(
            validate_user(&roles, &restricted),
            Err(PolicyError::Validation(ValidationError::RestrictedCapabilities { .. }))
        ));

        let unknown = stored_user("contractor", Capabilities::DASHBOARD);
        assert!(matches!(validate_user(&roles, &unknown), Err(PolicyError::UnknownRole(_))));
    }
}
