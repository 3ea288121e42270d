use gdxfile::container::GdxFile;
use gdxfile::errors;
use gdxfile::symbols::DataType;

fn temp_path(name: &str) -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("gdx_ap_{}_{}", std::process::id(), name));
    p.to_string_lossy().into_owned()
}

#[test]
fn test_append_adds_symbol_and_keeps_old_data() {
    let path = temp_path("append.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "append_test", 0));
        assert!(gdx.data_write_str_start("r", "first", 1, DataType::Parameter, 0));
        assert!(gdx.data_write_str(&["one"], &[1.0]));
        assert!(gdx.data_write_str(&["two"], &[2.0]));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_append(&path, "appender"));
        assert!(gdx.data_write_str_start("q", "second", 2, DataType::Parameter, 0));
        assert!(gdx.data_write_str(&["one", "two"], &[12.0]));
        assert!(gdx.data_write_str(&["two", "extra"], &[22.0]));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        let (sy_cnt, uel_cnt) = gdx.system_info();
        assert_eq!(sy_cnt, 2);
        assert_eq!(uel_cnt, 3);

        // the old symbol is unchanged
        let synr = gdx.find_symbol("r").unwrap();
        gdx.data_read_str_start(synr).unwrap();
        let mut keys = vec![String::new(); 20];
        let mut vals = [0.0f64; 5];
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_some());
        assert_eq!(keys[0], "one");
        assert_eq!(vals[0], 1.0);
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_some());
        assert_eq!(keys[0], "two");
        assert_eq!(vals[0], 2.0);
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_none());

        // and the appended one is there
        let synr = gdx.find_symbol("q").unwrap();
        let (_, dim, _) = gdx.symbol_info(synr).unwrap();
        assert_eq!(dim, 2);
        gdx.data_read_str_start(synr).unwrap();
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_some());
        assert_eq!(keys[0], "one");
        assert_eq!(keys[1], "two");
        assert_eq!(vals[0], 12.0);
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_some());
        assert_eq!(keys[0], "two");
        assert_eq!(keys[1], "extra");
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_none());
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_append_forbids_replacing_a_symbol() {
    let path = temp_path("replace.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "append_test", 0));
        assert!(gdx.data_write_str_start("r", "", 1, DataType::Parameter, 0));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_append(&path, "appender"));
        assert!(!gdx.data_write_str_start("r", "", 1, DataType::Parameter, 0));
        assert_eq!(gdx.get_last_error(), errors::ERR_DUPLICATESYMBOL);
        assert_eq!(gdx.close(), 0);
    }
    std::fs::remove_file(&path).unwrap();
}
