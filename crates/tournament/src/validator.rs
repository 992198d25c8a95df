//! Submission validation
//!
//! Every submission either becomes a [`Participant`] or receives a
//! [`Disqualification`]. Nothing in here returns an error or lets a panic
//! escape: misbehaving factories are data, not failures.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use arena_core::{console, AgentArgs, FactorySignature, Team, TeamFactory, AGENTS_PER_TEAM};
use serde::{Deserialize, Serialize};

use crate::error::panic_message;

/// Why a submission was not allowed to compete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disqualification {
    CannotImport,
    NoCreateTeam,
    CreateTeamTooFewArgs,
    CreateTeamTooManyNondefaults,
    CreateTeamRuntime,
    CreateTeamNoReturn,
    CreateTeamWrongReturn,
}

impl Disqualification {
    pub fn message(self) -> &'static str {
        match self {
            Disqualification::CannotImport => "Error while loading the submission.",
            Disqualification::NoCreateTeam => "No team factory found.",
            Disqualification::CreateTeamTooFewArgs => "The team factory has too few arguments.",
            Disqualification::CreateTeamTooManyNondefaults => {
                "The team factory has too many arguments without defaults."
            }
            Disqualification::CreateTeamRuntime => "The team factory failed at runtime.",
            Disqualification::CreateTeamNoReturn => "The team factory returned nothing.",
            Disqualification::CreateTeamWrongReturn => {
                "The team factory did not return exactly 2 agents."
            }
        }
    }
}

impl fmt::Display for Disqualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Contact information attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contact {
    /// Comma separated addresses.
    Single(String),
    /// Several entries, each of which may itself be comma separated.
    Many(Vec<String>),
}

impl Contact {
    pub fn addresses(&self) -> BTreeSet<String> {
        let entries: &[String] = match self {
            Contact::Single(entry) => std::slice::from_ref(entry),
            Contact::Many(entries) => entries,
        };
        entries
            .iter()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A candidate team as handed in.
#[derive(Clone)]
pub struct Submission {
    pub team_name: String,
    pub factory: Option<Arc<dyn TeamFactory>>,
    pub contact: Option<Contact>,
    /// Set when the submission could not even be loaded.
    pub load_error: Option<String>,
}

impl Submission {
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            factory: None,
            contact: None,
            load_error: None,
        }
    }

    pub fn with_factory(mut self, factory: impl TeamFactory + 'static) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn failed_to_load(team_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            load_error: Some(reason.into()),
            ..Self::new(team_name)
        }
    }
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("team_name", &self.team_name)
            .field("has_factory", &self.factory.is_some())
            .field("contact", &self.contact)
            .field("load_error", &self.load_error)
            .finish()
    }
}

/// A qualified team.
#[derive(Clone)]
pub struct Participant {
    pub name: String,
    pub factory: Arc<dyn TeamFactory>,
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Outcome of validating all submissions.
#[derive(Debug, Default)]
pub struct Validation {
    pub contacts: BTreeSet<String>,
    pub qualified: BTreeMap<String, Participant>,
    pub disqualified: BTreeMap<String, Disqualification>,
}

pub fn validate_submissions(submissions: impl IntoIterator<Item = Submission>) -> Validation {
    let mut validation = Validation::default();

    for submission in submissions {
        if let Some(contact) = &submission.contact {
            validation.contacts.extend(contact.addresses());
        }

        let verdict = match (&submission.load_error, &submission.factory) {
            (Some(reason), _) => {
                tracing::warn!(team = %submission.team_name, %reason, "Submission failed to load");
                Err(Disqualification::CannotImport)
            }
            (None, None) => Err(Disqualification::NoCreateTeam),
            (None, Some(factory)) => validate_factory(factory.as_ref()).map(|()| factory),
        };

        match verdict {
            Ok(factory) => {
                validation.qualified.insert(
                    submission.team_name.clone(),
                    Participant {
                        name: submission.team_name,
                        factory: Arc::clone(factory),
                    },
                );
            }
            Err(reason) => {
                tracing::info!(team = %submission.team_name, %reason, "Team disqualified");
                validation.disqualified.insert(submission.team_name, reason);
            }
        }
    }

    validation
}

/// Build both sides once with fixed indices and check what comes back.
pub fn validate_factory(factory: &dyn TeamFactory) -> Result<(), Disqualification> {
    let _mute = console::mute();
    let args = AgentArgs::new();

    let teams = build_team(factory, 0, 1, true, &args)
        .and_then(|home| build_team(factory, 2, 3, false, &args).map(|away| (home, away)));

    match teams {
        Err(_) => Err(diagnose(factory.signature())),
        Ok((Some(home), Some(away))) => {
            if home.len() == AGENTS_PER_TEAM && away.len() == AGENTS_PER_TEAM {
                Ok(())
            } else {
                Err(Disqualification::CreateTeamWrongReturn)
            }
        }
        Ok(_) => Err(Disqualification::CreateTeamNoReturn),
    }
}

fn diagnose(signature: FactorySignature) -> Disqualification {
    if signature.positional < FactorySignature::STANDARD_ARITY {
        Disqualification::CreateTeamTooFewArgs
    } else if signature.required > FactorySignature::STANDARD_ARITY {
        Disqualification::CreateTeamTooManyNondefaults
    } else {
        Disqualification::CreateTeamRuntime
    }
}

/// Call a factory, turning both errors and panics into `Err(message)`.
pub(crate) fn build_team(
    factory: &dyn TeamFactory,
    first_index: usize,
    second_index: usize,
    is_home: bool,
    args: &AgentArgs,
) -> Result<Option<Team>, String> {
    let call = panic::catch_unwind(AssertUnwindSafe(|| {
        factory.create_team(first_index, second_index, is_home, args)
    }));
    match call {
        Ok(Ok(team)) => Ok(team),
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod validator_tests;
