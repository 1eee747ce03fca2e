//! Privilege comparison.
//!
//! Rules:
//! 1. The super-admin role can act on every registered role
//! 2. Otherwise the actor's rank must be strictly lower (more privileged)
//!    than the target's; peers of equal rank cannot manage each other
//! 3. Unknown roles never compare successfully

use wf_common::User;

use super::error::PolicyError;
use super::Actor;
use crate::roles::{RoleHierarchy, UnknownRole};

/// Can a holder of `actor_role` act on a holder of `target_role`?
///
/// Pure and total over registered roles. Callers must treat `Err` as a
/// denial.
pub fn can_act_on(
    roles: &RoleHierarchy,
    actor_role: &str,
    target_role: &str,
) -> Result<bool, UnknownRole> {
    let target_rank = roles.rank(target_role)?;
    if roles.is_super_admin(actor_role) {
        return Ok(true);
    }
    let actor_rank = roles.rank(actor_role)?;
    Ok(actor_rank < target_rank)
}

/// Call-site check for editing or deleting `target`.
///
/// Self-targeted actions are denied before any rank comparison.
pub fn authorize_action(
    roles: &RoleHierarchy,
    actor: &Actor,
    target: &User,
) -> Result<(), PolicyError> {
    if actor.id == target.id {
        return Err(PolicyError::SelfAction);
    }
    require_rank(roles, &actor.role, &target.role)
}

/// An actor may only hand out roles it outranks.
pub fn authorize_role_assignment(
    roles: &RoleHierarchy,
    actor: &Actor,
    role_id: &str,
) -> Result<(), PolicyError> {
    require_rank(roles, &actor.role, role_id)
}

fn require_rank(
    roles: &RoleHierarchy,
    actor_role: &str,
    target_role: &str,
) -> Result<(), PolicyError> {
    if can_act_on(roles, actor_role, target_role)? {
        Ok(())
    } else {
        Err(PolicyError::RoleHierarchy {
            actor_role: actor_role.to_string(),
            target_role: target_role.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use wf_common::{Capabilities, DeletionRequestState};

    use super::*;

    fn user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Test".to_string(),
            last_name: role.to_string(),
            email: format!("{role}@example.com"),
            role: role.to_string(),
            capabilities: Capabilities::DASHBOARD,
            deletion_request_state: DeletionRequestState::None,
        }
    }

    #[test]
    fn test_rule_holds_for_every_registered_pair() {
        let roles = RoleHierarchy::builtin();
        for a in roles.roles() {
            for b in roles.roles() {
                let expected = a.super_admin || a.rank < b.rank;
                assert_eq!(
                    can_act_on(&roles, &a.id, &b.id),
                    Ok(expected),
                    "{} -> {}",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn test_same_role_is_not_privileged() {
        let roles = RoleHierarchy::builtin();
        for role in ["admin", "compliance", "head-of-operations", "osm"] {
            assert_eq!(can_act_on(&roles, role, role), Ok(false), "{role}");
        }
    }

    #[test]
    fn test_compliance_over_head_of_operations() {
        let roles = RoleHierarchy::builtin();
        assert_eq!(can_act_on(&roles, "compliance", "head-of-operations"), Ok(true));
        assert_eq!(can_act_on(&roles, "head-of-operations", "compliance"), Ok(false));
    }

    #[test]
    fn test_admin_over_osm() {
        let roles = RoleHierarchy::builtin();
        assert_eq!(can_act_on(&roles, "admin", "osm"), Ok(true));
    }

    #[test]
    fn test_super_admin_over_everything_including_itself() {
        let roles = RoleHierarchy::builtin();
        assert_eq!(can_act_on(&roles, "super-admin", "super-admin"), Ok(true));
        assert_eq!(can_act_on(&roles, "super-admin", "osm"), Ok(true));
    }

    #[test]
    fn test_unknown_roles_error_on_either_side() {
        let roles = RoleHierarchy::builtin();
        assert_eq!(
            can_act_on(&roles, "ghost", "osm"),
            Err(UnknownRole("ghost".to_string()))
        );
        assert_eq!(
            can_act_on(&roles, "admin", "ghost"),
            Err(UnknownRole("ghost".to_string()))
        );
        assert_eq!(
            can_act_on(&roles, "super-admin", "ghost"),
            Err(UnknownRole("ghost".to_string()))
        );
    }

    #[test]
    fn test_equal_rank_different_roles_denied() {
        let roles = RoleHierarchy::from_table(vec![
            crate::roles::RoleEntry {
                id: "payroll".to_string(),
                display_name: "Payroll".to_string(),
                rank: 3,
                restricted_capabilities: vec![],
                requires_deletion_approval: false,
                super_admin: false,
            },
            crate::roles::RoleEntry {
                id: "audit".to_string(),
                display_name: "Audit".to_string(),
                rank: 3,
                restricted_capabilities: vec![],
                requires_deletion_approval: false,
                super_admin: false,
            },
        ])
        .unwrap();

        assert_eq!(can_act_on(&roles, "payroll", "audit"), Ok(false));
        assert_eq!(can_act_on(&roles, "audit", "payroll"), Ok(false));
    }

    #[test]
    fn test_self_action_denied_for_every_role() {
        let roles = RoleHierarchy::builtin();
        for role in roles.roles() {
            let me = user(&role.id);
            let actor = Actor::from(&me);
            let result = authorize_action(&roles, &actor, &me);
            assert!(
                matches!(result, Err(PolicyError::SelfAction)),
                "{} acting on self",
                role.id
            );
        }
    }

    #[test]
    fn test_authorize_action_maps_rank_to_hierarchy_error() {
        let roles = RoleHierarchy::builtin();
        let actor = Actor::from(&user("head-of-operations"));
        let target = user("compliance");

        let result = authorize_action(&roles, &actor, &target);
        assert!(matches!(
            result,
            Err(PolicyError::RoleHierarchy { actor_role, target_role })
                if actor_role == "head-of-operations" && target_role == "compliance"
        ));
    }

    #[test]
    fn test_authorize_action_unknown_target_role_is_denied() {
        let roles = RoleHierarchy::builtin();
        let actor = Actor::from(&user("super-admin"));
        let target = user("contractor");

        let result = authorize_action(&roles, &actor, &target);
        assert!(matches!(result, Err(PolicyError::UnknownRole(_))));
    }

    #[test]
    fn test_role_assignment_requires_outranking() {
        let roles = RoleHierarchy::builtin();
        let admin = Actor::from(&user("admin"));

        assert!(authorize_role_assignment(&roles, &admin, "osm").is_ok());
        assert!(authorize_role_assignment(&roles, &admin, "admin").is_err());
        assert!(authorize_role_assignment(&roles, &admin, "super-admin").is_err());
    }
}
