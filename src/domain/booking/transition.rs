//! Booking status transitions
//!
//! | current     | role           | may request            |
//! |-------------|----------------|------------------------|
//! | pending     | customer       | cancelled              |
//! | pending     | admin, cashier | on_progress, cancelled |
//! | on_progress | admin, cashier | completed, cancelled   |
//!
//! `completed` and `cancelled` are final. `confirmed` has no rows: nothing
//! moves a booking out of it through a status update.

use super::BookingStatus;
use crate::domain::user::UserRole;
use crate::shared::errors::TransitionRejection;

use BookingStatus::*;
use UserRole::*;

struct Rule {
    from: BookingStatus,
    roles: &'static [UserRole],
    to: &'static [BookingStatus],
}

const RULES: &[Rule] = &[
    Rule {
        from: Pending,
        roles: &[Customer],
        to: &[Cancelled],
    },
    Rule {
        from: Pending,
        roles: &[Admin, Cashier],
        to: &[OnProgress, Cancelled],
    },
    Rule {
        from: OnProgress,
        roles: &[Admin, Cashier],
        to: &[Completed, Cancelled],
    },
];

/// Decide whether `role` may move a booking from `current` to `requested`.
pub fn check_booking_transition(
    current: BookingStatus,
    role: UserRole,
    requested: BookingStatus,
) -> Result<BookingStatus, TransitionRejection> {
    if current.is_terminal() {
        return Err(TransitionRejection::TerminalState {
            entity: "booking",
            status: current.to_string(),
        });
    }

    let mut rules = RULES.iter().filter(|r| r.from == current).peekable();
    if rules.peek().is_none() {
        return Err(TransitionRejection::NoTransitions {
            entity: "booking",
            status: current.to_string(),
        });
    }

    if rules.any(|r| r.roles.contains(&role) && r.to.contains(&requested)) {
        Ok(requested)
    } else {
        Err(TransitionRejection::RoleNotAllowed {
            entity: "booking",
            role: role.to_string(),
            from: current.to_string(),
            to: requested.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [UserRole; 4] = [Admin, Cashier, Mechanic, Customer];

    #[test]
    fn customer_may_only_cancel_pending() {
        for requested in BookingStatus::ALL {
            let result = check_booking_transition(Pending, Customer, requested);
            if requested == Cancelled {
                assert_eq!(result, Ok(Cancelled));
            } else {
                assert!(
                    matches!(result, Err(TransitionRejection::RoleNotAllowed { .. })),
                    "customer pending -> {} should be refused",
                    requested
                );
            }
        }
    }

    #[test]
    fn staff_rows() {
        for role in [Admin, Cashier] {
            assert_eq!(check_booking_transition(Pending, role, OnProgress), Ok(OnProgress));
            assert_eq!(check_booking_transition(Pending, role, Cancelled), Ok(Cancelled));
            assert_eq!(check_booking_transition(OnProgress, role, Completed), Ok(Completed));
            assert_eq!(check_booking_transition(OnProgress, role, Cancelled), Ok(Cancelled));

            assert!(check_booking_transition(Pending, role, Completed).is_err());
            assert!(check_booking_transition(Pending, role, Confirmed).is_err());
            assert!(check_booking_transition(OnProgress, role, Pending).is_err());
        }
    }

    #[test]
    fn customer_cannot_touch_on_progress() {
        let err = check_booking_transition(OnProgress, Customer, Cancelled).unwrap_err();
        assert_eq!(
            err,
            TransitionRejection::RoleNotAllowed {
                entity: "booking",
                role: "customer".into(),
                from: "on_progress".into(),
                to: "cancelled".into(),
            }
        );
    }

    #[test]
    fn mechanic_has_no_booking_rows() {
        for from in [Pending, OnProgress] {
            for requested in BookingStatus::ALL {
                assert!(check_booking_transition(from, Mechanic, requested).is_err());
            }
        }
    }

    #[test]
    fn terminal_states_reject_everything() {
        for from in [Completed, Cancelled] {
            for role in ROLES {
                for requested in BookingStatus::ALL {
                    assert!(matches!(
                        check_booking_transition(from, role, requested),
                        Err(TransitionRejection::TerminalState { .. })
                    ));
                }
            }
        }
    }

    #[test]
    fn confirmed_has_no_outgoing_transitions() {
        for role in ROLES {
            for requested in BookingStatus::ALL {
                assert!(matches!(
                    check_booking_transition(Confirmed, role, requested),
                    Err(TransitionRejection::NoTransitions { .. })
                ));
            }
        }
    }

    #[test]
    fn accepted_result_is_always_the_requested_status() {
        for from in BookingStatus::ALL {
            for role in ROLES {
                for requested in BookingStatus::ALL {
                    if let Ok(next) = check_booking_transition(from, role, requested) {
                        assert_eq!(next, requested);
                        assert!(!from.is_terminal());
                    }
                }
            }
        }
    }
}
