use tsclib::{TscPrinter, PortTarget, StatusCode, LabelJob, Element, Error, ErrorKind};
use tsclib::backend::{RecordingBackend, Call, Operation};
use tsclib::label::{LabelConfiguration, InternalFontText, Barcode, WindowsFontText};

fn label() -> LabelConfiguration {
    LabelConfiguration::builder(70.0, 40.0).speed(4.0).density(10).gap(3.0, 0.0).build()
}

fn recorded() -> (TscPrinter<RecordingBackend>, RecordingBackend) {
    let backend = RecordingBackend::new();
    let probe = backend.clone();
    (TscPrinter::new(backend), probe)
}

#[test]
fn print_a_test_label() {
    let (mut printer, probe) = recorded();
    let text = InternalFontText::new(50, 50, "3", "Internal Font Test");
    let barcode = Barcode::new(50, 100, "128", 70, "TEST12345");

    printer.with_session(PortTarget::Usb, |printer| {
        assert_eq!(printer.get_status()?, StatusCode::Ready);
        printer.setup_label(&label())?;
        printer.clear_buffer()?;
        printer.add_internal_font_text(&text)?;
        printer.add_barcode(&barcode)?;
        printer.print_label(1, 1)
    }).unwrap();

    assert_eq!(probe.calls(), vec![
        Call::OpenPort(PortTarget::Usb),
        Call::QueryStatus,
        Call::Setup(label()),
        Call::ClearBuffer,
        Call::PrinterFont(text),
        Call::Barcode(barcode),
        Call::PrintLabel{quantity: 1, copies: 1},
        Call::ClosePort
    ]);
    assert!(!printer.is_open());
}

#[test]
fn raw_commands_are_passed_through() {
    let (mut printer, probe) = recorded();
    let utf8 = "TEXT 50,500,\"KAIU.TTF\",0,12,12,\"標楷體 UTF-8 測試\"";

    printer.with_session(PortTarget::Usb, |printer| {
        printer.send_raw_command("BOX 50,350,600,450,3")?;
        printer.send_raw_command_utf8(utf8)
    }).unwrap();

    let calls = probe.calls();
    assert_eq!(calls[1], Call::SendCommand("BOX 50,350,600,450,3".to_string()));
    assert_eq!(calls[2], Call::SendCommandUtf8(utf8.as_bytes().to_vec()));
}

#[test]
fn replay_a_stored_job() {
    let job = LabelJob::new(label())
        + InternalFontText::new(50, 50, "3", "Internal Font Test")
        + Barcode::new(50, 100, "128", 70, "TEST12345")
        + WindowsFontText::new(50, 250, 48, "Arial", "Windows Arial Test");
    let job = job.command("BOX 50,350,600,450,3").command_utf8("CODEPAGE UTF-8");
    let stored = serde_json::to_string(&job).unwrap();

    let (mut printer, probe) = recorded();
    let job: LabelJob = serde_json::from_str(&stored).unwrap();
    assert_eq!(job.elements[1], Element::Barcode(Barcode::new(50, 100, "128", 70, "TEST12345")));
    printer.with_session(PortTarget::Index(0), |printer| printer.print_job(&job, 2, 1)).unwrap();

    let operations: Vec<Operation> = probe.calls().iter().map(Call::operation).collect();
    assert_eq!(operations, vec![
        Operation::OpenPort,
        Operation::Setup,
        Operation::ClearBuffer,
        Operation::PrinterFont,
        Operation::Barcode,
        Operation::WindowsFont,
        Operation::SendCommand,
        Operation::SendCommandUtf8,
        Operation::PrintLabel,
        Operation::ClosePort
    ]);
    assert_eq!(probe.calls()[8], Call::PrintLabel{quantity: 2, copies: 1});
}

#[test]
fn port_is_closed_exactly_once_whatever_fails() {
    let failures = [Operation::Setup, Operation::ClearBuffer, Operation::PrinterFont, Operation::Barcode, Operation::PrintLabel];
    for failing in failures.iter() {
        let (mut printer, probe) = recorded();
        probe.fail_next(*failing, Error::Printer("rejected".to_string()));
        let result = printer.with_session(PortTarget::Usb, |printer| {
            printer.setup_label(&label())?;
            printer.clear_buffer()?;
            printer.add_internal_font_text(&InternalFontText::new(50, 50, "3", "A"))?;
            printer.add_barcode(&Barcode::new(50, 100, "128", 70, "1"))?;
            printer.print_label(1, 1)
        });
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Printer);
        assert!(!printer.is_open());
        drop(printer);
        assert_eq!(probe.count(Operation::ClosePort), 1, "after {:?} failed", failing);
    }
}

#[test]
fn unreachable_printer() {
    let (mut printer, probe) = recorded();
    probe.fail_next(Operation::OpenPort, Error::Connection("no TSC printer on the bus".to_string()));
    let result = printer.with_session(PortTarget::Usb, |printer| printer.clear_buffer());
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Connection);
    assert_eq!(probe.calls(), vec![Call::OpenPort(PortTarget::Usb)]);
}
