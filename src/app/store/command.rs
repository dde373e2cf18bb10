use crate::domain::SubmitRequest;
use crate::infra::realtime::OutboundEvent;

/// Side effects requested by the reducer and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    Disconnect,
    Emit(OutboundEvent),
    LoadProjects,
    SubmitProject(SubmitRequest),
}
