// SPDX-License-Identifier: MIT

//! Turns a parsed `Command` into `Configuration` calls and a wire
//! `Response`, persisting applied `CREATE`/`WRITE` requests to the fboot
//! log as it goes.

use fbrt_core::{Clock, FbName, TypeName};
use fbrt_runtime::Configuration;
use fbrt_storage::FbootLog;
use fbrt_wire::{build_read_response, build_status_response, Command, Request};
use parking_lot::Mutex;

/// Extracts the FB name the fboot log prefixes a persisted line with.
fn start_fb_name(command: &Command) -> Option<&str> {
    match command {
        Command::CreateFb { name, .. } => Some(name.as_str()),
        Command::CreateConnection { source, .. } => {
            fbrt_core::split_port_ref(source).map(|(fb, _)| fb)
        }
        Command::WriteConnection { destination, .. } => {
            fbrt_core::split_port_ref(destination).map(|(fb, _)| fb)
        }
        _ => None,
    }
}

/// Applies `command` against `config`. Returns the response body.
pub fn dispatch<C: Clock>(
    config: &Configuration<C>,
    request: &Request,
    raw_xml: &str,
    fboot: &Mutex<FbootLog>,
) -> String {
    let result = apply(config, &request.command);

    if result.is_ok() {
        if let Some(fb_name) = start_fb_name(&request.command) {
            if fbrt_storage::should_persist(raw_xml) {
                if let Err(error) = fboot.lock().append(fb_name, raw_xml) {
                    tracing::error!(%error, "failed to persist deployment entry");
                }
            }
        }
    }

    match &request.command {
        Command::ReadWatches { cursor_ms } => match result {
            Ok(()) => {
                let groups = config.read_watches(*cursor_ms);
                build_read_response(&request.id, config.id(), &groups)
            }
            Err(error) => build_status_response(&request.id, Some(&error.to_string())),
        },
        _ => match result {
            Ok(()) => build_status_response(&request.id, None),
            Err(error) => build_status_response(&request.id, Some(&error.to_string())),
        },
    }
}

pub(crate) fn apply<C: Clock>(
    config: &Configuration<C>,
    command: &Command,
) -> Result<(), fbrt_runtime::ConfigurationError> {
    match command {
        Command::CreateFb { name, fb_type } => {
            config.create_fb(FbName::new(name.clone()), TypeName::new(fb_type.clone()))
        }
        Command::CreateConnection { source, destination } => {
            config.create_connection(source, destination)
        }
        Command::WriteConnection { constant, destination } => {
            config.write_connection(constant, destination)
        }
        Command::CreateWatch { port_ref } => config.create_watch(port_ref),
        Command::DeleteWatch { port_ref } => config.delete_watch(port_ref),
        Command::Start => {
            config.start_work();
            Ok(())
        }
        Command::Stop => {
            // `stop_work` is async; the TCP handler awaits it directly
            // (see `listener::handle_connection`) rather than through this
            // synchronous dispatch helper.
            Ok(())
        }
        Command::ReadWatches { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbrt_behavior::BehaviorRegistry;
    use fbrt_core::{ConfigId, FakeClock};
    use fbrt_typedef::TypeRegistry;
    use fbrt_wire::parse_request;
    use std::fs;

    fn setup() -> (tempfile::TempDir, Configuration<FakeClock>, Mutex<FbootLog>) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("E_SWITCH.fbt"),
            r#"<FBType Name="E_SWITCH"><InterfaceList>
                <EventInputs><Event Name="EI" Type="Event"/></EventInputs>
                <EventOutputs><Event Name="EO0" Type="Event"/></EventOutputs>
                <InputVars/><OutputVars/>
            </InterfaceList></FBType>"#,
        )
        .unwrap();
        fs::write(dir.path().join("E_SWITCH.rs"), "// stub").unwrap();
        let types = TypeRegistry::discover(dir.path()).unwrap();
        let behaviors = BehaviorRegistry::with_builtins();
        let config = Configuration::new(ConfigId::new("c1"), types, behaviors, FakeClock::new());
        let fboot = Mutex::new(FbootLog::open(dir.path().join("data_model.fboot")).unwrap());
        (dir, config, fboot)
    }

    #[test]
    fn create_fb_persists_and_returns_ok_status() {
        let (_dir, config, fboot) = setup();
        let xml = r#"<Request ID="1" Action="CREATE"><FB Name="A" Type="E_SWITCH"/></Request>"#;
        let request = parse_request(xml).unwrap();
        let response = dispatch(&config, &request, xml, &fboot);
        assert!(response.contains(r#"Status="OK""#));
        assert_eq!(fboot.lock().path().exists(), true);
    }

    #[test]
    fn unknown_fb_type_returns_failure_status() {
        let (_dir, config, fboot) = setup();
        let xml = r#"<Request ID="1" Action="CREATE"><FB Name="A" Type="NOPE"/></Request>"#;
        let request = parse_request(xml).unwrap();
        let response = dispatch(&config, &request, xml, &fboot);
        assert!(response.contains(r#"Status="FAIL""#));
    }

    #[test]
    fn watch_requests_are_not_persisted() {
        let (_dir, config, fboot) = setup();
        let create_xml = r#"<Request ID="1" Action="CREATE"><FB Name="A" Type="E_SWITCH"/></Request>"#;
        dispatch(&config, &parse_request(create_xml).unwrap(), create_xml, &fboot);

        let watch_xml = r#"<Request ID="2" Action="CREATE"><Watch Source="A.EI"/></Request>"#;
        let request = parse_request(watch_xml).unwrap();
        let response = dispatch(&config, &request, watch_xml, &fboot);
        assert!(response.contains(r#"Status="OK""#));

        let entries = fbrt_storage::FbootLog::replay(fboot.lock().path()).unwrap();
        assert_eq!(entries.len(), 1);
    }
}
