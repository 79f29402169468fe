use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

extern "C" fn on_interrupt(_: nix::libc::c_int) {}

/// Keeps SIGINT from killing the interpreter while a child runs. A caught
/// signal reverts to its default action across exec, so children still die
/// on Ctrl-C.
pub fn install_interrupt_handler() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    // SAFETY: the handler is empty and therefore async-signal-safe.
    unsafe { sigaction(Signal::SIGINT, &action) }?;
    Ok(())
}
