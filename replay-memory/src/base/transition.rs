//! Transition.

/// One recorded step of interaction with an environment.
///
/// The memories never inspect the fields; they only store transitions and
/// copy them into batches. Each field has its own type parameter so callers
/// keep full type information for states (`S`), actions (`A`), rewards (`R`)
/// and auxiliary data (`X`).
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, A, R, X> {
    /// State before the action, `o_t`.
    pub state_before: S,

    /// Action taken, `a_t`.
    pub action: A,

    /// Reward received, `r_t`.
    pub reward: R,

    /// State after the action, `o_t+1`.
    pub state_after: S,

    /// Arbitrary data attached to the step.
    pub auxiliary: X,
}

impl<S, A, R, X> Transition<S, A, R, X> {
    /// Creates a transition.
    pub fn new(state_before: S, action: A, reward: R, state_after: S, auxiliary: X) -> Self {
        Self {
            state_before,
            action,
            reward,
            state_after,
            auxiliary,
        }
    }

    /// Unpack the data `(o_t, a_t, r_t, o_t+1, aux)`.
    pub fn unpack(self) -> (S, A, R, S, X) {
        (
            self.state_before,
            self.action,
            self.reward,
            self.state_after,
            self.auxiliary,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack() {
        let tr = Transition::new(vec![0.5f32], 2i64, -1.0f32, vec![1.5f32], "done");
        let (state_before, action, reward, state_after, auxiliary) = tr.clone().unpack();
        assert_eq!(state_before, tr.state_before);
        assert_eq!(action, 2);
        assert_eq!(reward, -1.0);
        assert_eq!(state_after, vec![1.5]);
        assert_eq!(auxiliary, "done");
    }
}
