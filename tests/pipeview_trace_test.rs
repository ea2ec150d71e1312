// tests/pipeview_trace_test.rs
//! Simulation log to O3PipeView conversion from a file on disk

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::{BufReader, Write};

    use vexp_harness::pipeview::{convert, parse_log, InsnKind, KindFilter, PipeViewOptions};

    const LOG: &str = "\
[core] reset
PipeView:20:dispatch:100:80001000:0:0:vle32.v v8, (a0)
PipeView:20:lasop:103:0:0
PipeView:20:lasop:104:0:1
PipeView:20:write.vrf:107:0
PipeView:20:write.vrf:108:1
PipeView:21:dispatch:101:80001004:0:0:vfmul.vv v8, v8, v9
PipeView:21:vxsop:108:0
PipeView:21:vxsop:109:1
PipeView:21:write.vrf:112:0
PipeView:21:write.vrf:113:1
PipeView:22:dispatch:102:80001008:0:0:vse32.v v8, (a1)
PipeView:22:vssop:113:0
PipeView:22:sasop:115:0:0
";

    fn write_log() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sim.log");
        let mut file = File::create(&path).unwrap();
        file.write_all(LOG.as_bytes()).unwrap();
        (dir, path)
    }

    fn fetch_lines(text: &str) -> Vec<&str> {
        text.lines().filter(|l| l.starts_with("O3PipeView:fetch")).collect()
    }

    #[test]
    fn test_kinds_from_log() {
        let (_dir, path) = write_log();
        let insns = parse_log(BufReader::new(File::open(&path).unwrap()), 1).unwrap();

        let kinds: Vec<InsnKind> = insns.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![InsnKind::Load, InsnKind::Compute, InsnKind::Store]);
        assert_eq!(insns[2].retire.len(), 1);
    }

    #[test]
    fn test_full_trace() {
        let (_dir, path) = write_log();
        let mut out = Vec::new();
        let count = convert(
            BufReader::new(File::open(&path).unwrap()),
            &PipeViewOptions::default(),
            &mut out,
        )
        .unwrap();
        assert_eq!(count, 3);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            fetch_lines(&text),
            vec![
                "O3PipeView:fetch:99999:0x80001000:0:20:┏ vle32.v v8, (a0)",
                "O3PipeView:fetch:99999:0x80001000:1:20:┗ vle32.v v8, (a0)",
                "O3PipeView:fetch:100999:0x80001004:0:21:┏ vfmul.vv v8, v8, v9",
                "O3PipeView:fetch:100999:0x80001004:1:21:┗ vfmul.vv v8, v8, v9",
                "O3PipeView:fetch:101999:0x80001008:0:22:┏ vse32.v v8, (a1)",
            ]
        );
        assert!(text.contains("O3PipeView:retire:113000"));
        assert!(text.contains("O3PipeView:retire:115000"));
    }

    #[test]
    fn test_store_only_trace() {
        let options = PipeViewOptions {
            cycle_time: 1,
            filter: KindFilter::from_flags(false, false, true),
            show_unretired: false,
        };
        let mut out = Vec::new();
        convert(LOG.as_bytes(), &options, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(fetch_lines(&text).len(), 1);
        assert_eq!(
            text.lines().collect::<Vec<_>>()[1..],
            [
                "O3PipeView:decode:0",
                "O3PipeView:rename:0",
                "O3PipeView:dispatch:102",
                "O3PipeView:issue:113",
                "O3PipeView:complete:0",
                "O3PipeView:retire:115",
            ]
        );
    }
}
