//! Error types for connection construction

use thiserror::Error;

/// Result type for connection-building operations
pub type Result<T> = std::result::Result<T, ConnectError>;

/// Errors that can occur while building (or removing) synaptic connections
#[derive(Error, Debug)]
pub enum ConnectError {
    /// User input violates a range or structural constraint
    #[error("Bad property: {reason}")]
    BadProperty {
        /// Reason the property is invalid
        reason: String,
    },

    /// Named synapse model does not exist in the model registry
    #[error("Unknown synapse type: {name}")]
    UnknownSynapseType {
        /// Name that failed to resolve
        name: String,
    },

    /// A rule requires a proxy on the target side but the target is proxyless
    #[error("Illegal connection: {reason}")]
    IllegalConnection {
        /// Reason the connection is illegal
        reason: String,
    },

    /// An unsupported combination of rule/options was requested
    #[error("Not implemented: {reason}")]
    NotImplemented {
        /// Reason the combination is unsupported
        reason: String,
    },

    /// Source and target collections (or arrays) differ in length
    #[error("Dimension mismatch: sources has {source_len}, targets has {target_len}")]
    DimensionMismatch {
        /// Length of the source side
        source_len: usize,
        /// Length of the target side
        target_len: usize,
    },

    /// A structural precondition of the kernel itself was violated
    #[error("Kernel exception: {reason}")]
    KernelException {
        /// Reason the kernel cannot proceed
        reason: String,
    },

    /// A worker thread's failure, re-raised on the caller's thread
    #[error("Worker thread {thread} failed: {source}")]
    WrappedThreadException {
        /// Index of the worker thread that failed
        thread: usize,
        /// The original error, boxed to cross the thread boundary
        #[source]
        source: Box<ConnectError>,
    },
}

impl ConnectError {
    /// Create a [`ConnectError::BadProperty`]
    pub fn bad_property(reason: impl Into<String>) -> Self {
        Self::BadProperty {
            reason: reason.into(),
        }
    }

    /// Create a [`ConnectError::UnknownSynapseType`]
    pub fn unknown_synapse_type(name: impl Into<String>) -> Self {
        Self::UnknownSynapseType { name: name.into() }
    }

    /// Create a [`ConnectError::IllegalConnection`]
    pub fn illegal_connection(reason: impl Into<String>) -> Self {
        Self::IllegalConnection {
            reason: reason.into(),
        }
    }

    /// Create a [`ConnectError::NotImplemented`]
    pub fn not_implemented(reason: impl Into<String>) -> Self {
        Self::NotImplemented {
            reason: reason.into(),
        }
    }

    /// Create a [`ConnectError::DimensionMismatch`]
    pub fn dimension_mismatch(source_len: usize, target_len: usize) -> Self {
        Self::DimensionMismatch {
            source_len,
            target_len,
        }
    }

    /// Create a [`ConnectError::KernelException`]
    pub fn kernel_exception(reason: impl Into<String>) -> Self {
        Self::KernelException {
            reason: reason.into(),
        }
    }

    /// Wrap an error that escaped a worker thread's parallel region
    pub fn wrap_thread(thread: usize, source: ConnectError) -> Self {
        Self::WrappedThreadException {
            thread,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_property_displays_reason() {
        let err = ConnectError::bad_property("indegree must be >= 0");
        assert!(err.to_string().contains("indegree must be >= 0"));
    }

    #[test]
    fn wrap_thread_preserves_source() {
        let inner = ConnectError::dimension_mismatch(3, 4);
        let wrapped = ConnectError::wrap_thread(2, inner);
        match &wrapped {
            ConnectError::WrappedThreadException { thread, source } => {
                assert_eq!(*thread, 2);
                assert!(matches!(**source, ConnectError::DimensionMismatch { .. }));
            }
            _ => panic!("expected WrappedThreadException"),
        }
        assert!(wrapped.to_string().contains("thread 2"));
    }

    #[test]
    fn unknown_synapse_type_carries_name() {
        let err = ConnectError::unknown_synapse_type("static_synapse_x");
        assert!(err.to_string().contains("static_synapse_x"));
    }
}
