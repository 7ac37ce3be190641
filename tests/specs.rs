// SPDX-License-Identifier: MIT

//! Six end-to-end scenarios exercised against `Configuration` directly
//! (not over the wire — `fbrt-wire`'s own `duplex_roundtrip` test already
//! covers the framing layer).

use fbrt_behavior::{Behavior, BehaviorFactory, BehaviorRegistry};
use fbrt_core::{ConfigId, DataType, FakeClock, FbName, TypeName, Value};
use fbrt_runtime::{Configuration, PortSnapshot};
use fbrt_typedef::TypeRegistry;
use std::time::Duration;

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

fn e_switch_fbt() -> &'static str {
    r#"<FBType Name="E_SWITCH"><InterfaceList>
        <EventInputs><Event Name="EI" Type="Event"/></EventInputs>
        <EventOutputs>
          <Event Name="EO0" Type="Event"/>
          <Event Name="EO1" Type="Event"/>
        </EventOutputs>
        <InputVars><VarDeclaration Name="G" Type="BOOL"/></InputVars>
        <OutputVars/>
    </InterfaceList></FBType>"#
}

fn write_fixture(dir: &std::path::Path, type_name: &str, fbt_xml: &str) {
    std::fs::write(dir.join(format!("{type_name}.fbt")), fbt_xml).unwrap();
    std::fs::write(dir.join(format!("{type_name}.rs")), "// stub").unwrap();
}

/// Scenario 1: single switch.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_1_single_switch() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "E_SWITCH", e_switch_fbt());
    let types = TypeRegistry::discover(dir.path()).unwrap();
    let behaviors = BehaviorRegistry::with_builtins();
    let config = Configuration::new(ConfigId::new("c1"), types, behaviors, FakeClock::new());

    config
        .create_fb(FbName::new("E_SWITCH_1"), TypeName::new("E_SWITCH"))
        .unwrap();
    config.start_work();

    config.write_connection("$e", "E_SWITCH_1.EI").unwrap();
    settle().await;

    assert_eq!(
        config.read_attr("E_SWITCH_1.EI").unwrap(),
        PortSnapshot::Event { counter: Some(1) }
    );
    assert_eq!(
        config.read_attr("E_SWITCH_1.G").unwrap(),
        PortSnapshot::Var {
            dtype: DataType::Bool,
            value: Value::Unset,
        }
    );
    assert_eq!(
        config.read_attr("E_SWITCH_1.EO0").unwrap(),
        PortSnapshot::Event { counter: Some(1) }
    );
    assert_eq!(
        config.read_attr("E_SWITCH_1.EO1").unwrap(),
        PortSnapshot::Event { counter: None }
    );

    config.stop_work().await;
}

/// Scenario 2: chain.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_2_chain() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "E_SWITCH", e_switch_fbt());
    let types = TypeRegistry::discover(dir.path()).unwrap();
    let behaviors = BehaviorRegistry::with_builtins();
    let config = Configuration::new(ConfigId::new("c1"), types, behaviors, FakeClock::new());

    config
        .create_fb(FbName::new("E_SWITCH_1"), TypeName::new("E_SWITCH"))
        .unwrap();
    config
        .create_fb(FbName::new("E_SWITCH_2"), TypeName::new("E_SWITCH"))
        .unwrap();
    config
        .create_connection("E_SWITCH_1.EO0", "E_SWITCH_2.EI")
        .unwrap();
    config.start_work();

    config.write_connection("$e", "E_SWITCH_1.EI").unwrap();
    settle().await;

    assert_eq!(
        config.read_attr("E_SWITCH_2.EI").unwrap(),
        PortSnapshot::Event { counter: Some(1) }
    );
    assert_eq!(
        config.read_attr("E_SWITCH_2.EO0").unwrap(),
        PortSnapshot::Event { counter: Some(1) }
    );

    config.stop_work().await;
}

/// Scenario 3: constant seeding.
#[tokio::test]
async fn scenario_3_constant_seeding() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "X_TYPE",
        r#"<FBType Name="X_TYPE"><InterfaceList>
            <EventInputs/><EventOutputs/>
            <InputVars><VarDeclaration Name="N" Type="INT"/></InputVars>
            <OutputVars/>
        </InterfaceList></FBType>"#,
    );
    let types = TypeRegistry::discover(dir.path()).unwrap();
    let mut behaviors = BehaviorRegistry::with_builtins();
    behaviors.register("X_TYPE", no_inputs_noop as BehaviorFactory);
    let config = Configuration::new(ConfigId::new("c1"), types, behaviors, FakeClock::new());

    config.create_fb(FbName::new("X"), TypeName::new("X_TYPE")).unwrap();
    config.write_connection("42", "X.N").unwrap();

    assert_eq!(
        config.read_attr("X.N").unwrap(),
        PortSnapshot::Var {
            dtype: DataType::Int,
            value: Value::Int(42),
        }
    );
}

/// Scenario 4: event literal, `$e` pulsed three times.
#[tokio::test]
async fn scenario_4_event_literal() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "Y_TYPE",
        r#"<FBType Name="Y_TYPE"><InterfaceList>
            <EventInputs><Event Name="E" Type="Event"/></EventInputs>
            <EventOutputs/><InputVars/><OutputVars/>
        </InterfaceList></FBType>"#,
    );
    let types = TypeRegistry::discover(dir.path()).unwrap();
    let mut behaviors = BehaviorRegistry::with_builtins();
    behaviors.register("Y_TYPE", no_inputs_noop as BehaviorFactory);
    let config = Configuration::new(ConfigId::new("c1"), types, behaviors, FakeClock::new());

    config.create_fb(FbName::new("Y"), TypeName::new("Y_TYPE")).unwrap();
    assert_eq!(
        config.read_attr("Y.E").unwrap(),
        PortSnapshot::Event { counter: None }
    );

    for _ in 0..3 {
        config.write_connection("$e", "Y.E").unwrap();
    }

    assert_eq!(
        config.read_attr("Y.E").unwrap(),
        PortSnapshot::Event { counter: Some(3) }
    );
}

/// Scenario 5: type coercion warning — an unrecognized `Type` on a
/// `VarDeclaration` loads as `String` rather than failing.
#[tokio::test]
async fn scenario_5_type_coercion_warning() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "WIDGET_HOST",
        r#"<FBType Name="WIDGET_HOST"><InterfaceList>
            <EventInputs/><EventOutputs/>
            <InputVars><VarDeclaration Name="V" Type="Widget"/></InputVars>
            <OutputVars/>
        </InterfaceList></FBType>"#,
    );
    let types = TypeRegistry::discover(dir.path()).unwrap();
    let mut behaviors = BehaviorRegistry::with_builtins();
    behaviors.register("WIDGET_HOST", no_inputs_noop as BehaviorFactory);
    let config = Configuration::new(ConfigId::new("c1"), types, behaviors, FakeClock::new());

    config
        .create_fb(FbName::new("H"), TypeName::new("WIDGET_HOST"))
        .unwrap();
    config.write_connection("hello", "H.V").unwrap();

    assert_eq!(
        config.read_attr("H.V").unwrap(),
        PortSnapshot::Var {
            dtype: DataType::String,
            value: Value::Str("hello".to_string()),
        }
    );
}

/// Scenario 6: worker isolation — a faulty FB's `schedule` stops its own
/// worker without affecting any other FB's executions.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_6_worker_isolation() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "FAULTY",
        r#"<FBType Name="FAULTY"><InterfaceList>
            <EventInputs><Event Name="E" Type="Event"/></EventInputs>
            <EventOutputs/><InputVars/><OutputVars/>
        </InterfaceList></FBType>"#,
    );
    write_fixture(dir.path(), "E_SWITCH", e_switch_fbt());
    let types = TypeRegistry::discover(dir.path()).unwrap();
    let mut behaviors = BehaviorRegistry::with_builtins();
    behaviors.register("FAULTY", faulty as BehaviorFactory);
    let config = Configuration::new(ConfigId::new("c1"), types, behaviors, FakeClock::new());

    config.create_fb(FbName::new("A"), TypeName::new("FAULTY")).unwrap();
    config.create_fb(FbName::new("B"), TypeName::new("E_SWITCH")).unwrap();
    config.start_work();

    config.write_connection("$e", "A.E").unwrap();
    settle().await;
    assert!(config.is_done("A"));

    // B never saw a faulty input and keeps running independently.
    config.write_connection("$e", "B.EI").unwrap();
    settle().await;
    assert!(!config.is_done("B"));
    assert_eq!(
        config.read_attr("B.EO0").unwrap(),
        PortSnapshot::Event { counter: Some(1) }
    );

    config.stop_work().await;
}

fn no_inputs_noop() -> Box<dyn Behavior> {
    struct Noop;
    impl Behavior for Noop {
        fn schedule(&self, _inputs: &[Value]) -> Option<Vec<Value>> {
            Some(Vec::new())
        }
        fn input_names(&self) -> &[&str] {
            &[]
        }
    }
    Box::new(Noop)
}

/// A behavior that always faults — modeled here as the `NullOutput` fatal
/// path, since `Behavior` reports faults through `Option` rather than
/// exceptions.
fn faulty() -> Box<dyn Behavior> {
    struct Faulty;
    impl Behavior for Faulty {
        fn schedule(&self, _inputs: &[Value]) -> Option<Vec<Value>> {
            None
        }
        fn input_names(&self) -> &[&str] {
            &[]
        }
    }
    Box::new(Faulty)
}
