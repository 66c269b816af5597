/// Who is using the form right now. Lives only as long as the host process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    SignedOut,
    SignedIn { email: String },
}

impl Session {
    pub fn sign_in(&mut self, email: impl Into<String>) {
        *self = Self::SignedIn {
            email: email.into(),
        };
    }

    pub fn sign_out(&mut self) {
        *self = Self::SignedOut;
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Self::SignedIn { email } => Some(email),
            Self::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_then_out() {
        let mut session = Session::default();
        assert_eq!(session.email(), None);

        session.sign_in("a@x.com");
        assert!(session.is_signed_in());
        assert_eq!(session.email(), Some("a@x.com"));

        session.sign_out();
        assert_eq!(session, Session::SignedOut);
    }
}
