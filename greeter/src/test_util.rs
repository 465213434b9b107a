use std::{collections::HashMap, io, sync::Mutex};

use crate::{
    credentials::{CredentialRole, CredentialSource, FileAccessError},
    event::{Event, EventSink},
};

pub(crate) const ROOT_CERT: &[u8] = include_bytes!("../data/secrets/root/public/ca.cert");
pub(crate) const CLIENT_CERT: &[u8] = include_bytes!("../data/secrets/client/public/service.pem");
pub(crate) const CLIENT_KEY: &[u8] = include_bytes!("../data/secrets/client/private/service.key");
pub(crate) const SERVER_CERT: &[u8] = include_bytes!("../data/secrets/server/public/service.pem");
pub(crate) const SERVER_KEY: &[u8] = include_bytes!("../data/secrets/server/private/service.key");

/// Serves credentials from memory and records every role that was asked for.
#[derive(Debug, Default)]
pub(crate) struct RecordingSource {
    files: HashMap<CredentialRole, Vec<u8>>,
    reads: Mutex<Vec<CredentialRole>>,
}

impl RecordingSource {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    /// All client credentials from the fixture PKI.
    pub(crate) fn complete() -> Self {
        Self::empty()
            .with(CredentialRole::RootCertificate, ROOT_CERT)
            .with(CredentialRole::ClientCertificate, CLIENT_CERT)
            .with(CredentialRole::ClientPrivateKey, CLIENT_KEY)
    }

    /// Root certificate plus the server identity.
    pub(crate) fn server() -> Self {
        Self::empty()
            .with(CredentialRole::RootCertificate, ROOT_CERT)
            .with(CredentialRole::ServerCertificate, SERVER_CERT)
            .with(CredentialRole::ServerPrivateKey, SERVER_KEY)
    }

    pub(crate) fn with(mut self, role: CredentialRole, contents: &[u8]) -> Self {
        self.files.insert(role, contents.to_vec());
        self
    }

    pub(crate) fn without(mut self, role: CredentialRole) -> Self {
        self.files.remove(&role);
        self
    }

    pub(crate) fn reads(&self) -> Vec<CredentialRole> {
        self.reads.lock().unwrap().clone()
    }
}

impl CredentialSource for RecordingSource {
    fn load(&self, role: CredentialRole) -> Result<Vec<u8>, FileAccessError> {
        self.reads.lock().unwrap().push(role);
        self.files.get(&role).cloned().ok_or_else(|| {
            FileAccessError::new(
                role,
                role.relative_path(),
                io::Error::from(io::ErrorKind::NotFound),
            )
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}
