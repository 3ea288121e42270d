use gdxfile::container::GdxFile;
use gdxfile::errors;
use gdxfile::symbols::DataType;
use gdxfile::values::{Sv, SV_PINF};

fn temp_path(name: &str) -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("gdx_rt_{}_{}", std::process::id(), name));
    p.to_string_lossy().into_owned()
}

#[test]
fn test_tiny_parameter_roundtrip() {
    let path = temp_path("demand.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "roundtrip_test", 0));
        assert!(gdx.data_write_str_start("Demand", "Demand data", 1, DataType::Parameter, 0));
        assert!(gdx.data_write_str(&["New-York"], &[324.0]));
        assert!(gdx.data_write_str(&["Chicago"], &[299.0]));
        assert!(gdx.data_write_str(&["Topeka"], &[274.0]));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        assert_eq!(gdx.get_last_error(), 0);

        let (sy_cnt, uel_cnt) = gdx.system_info();
        assert_eq!(sy_cnt, 1);
        assert_eq!(uel_cnt, 3);

        assert_eq!(gdx.find_symbol("demand"), Some(1));
        let (name, dim, typ) = gdx.symbol_info(1).unwrap();
        assert_eq!(name, "Demand");
        assert_eq!(dim, 1);
        assert_eq!(typ, DataType::Parameter);
        let (rec_cnt, user_info, expl) = gdx.symbol_info_x(1).unwrap();
        assert_eq!(rec_cnt, 3);
        assert_eq!(user_info, 0);
        assert_eq!(expl, "Demand data");

        let nr_recs = gdx.data_read_str_start(1).unwrap();
        assert_eq!(nr_recs, 3);
        let mut keys = vec![String::new(); 20];
        let mut vals = [0.0f64; 5];
        let expected: [(&str, f64); 3] =
            [("New-York", 324.0), ("Chicago", 299.0), ("Topeka", 274.0)];
        for &(uel, v) in expected.iter() {
            assert!(gdx.data_read_str(&mut keys, &mut vals).is_some());
            assert_eq!(keys[0], uel);
            assert_eq!(vals[0].to_bits(), v.to_bits());
        }
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_none());
        assert_eq!(gdx.get_last_error(), 0);
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_universe_read() {
    let path = temp_path("universe.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "roundtrip_test", 0));
        assert!(gdx.data_write_str_start("i", "plants", 1, DataType::Set, 0));
        assert!(gdx.data_write_str(&["seattle"], &[0.0]));
        assert!(gdx.data_write_str(&["san-diego"], &[0.0]));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        // symbol number 0 is the universe
        assert_eq!(gdx.find_symbol("*"), Some(0));
        let nr_recs = gdx.data_read_str_start(0).unwrap();
        assert_eq!(nr_recs, 2);
        let mut keys = vec![String::new(); 20];
        let mut vals = [0.0f64; 5];
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_some());
        assert_eq!(keys[0], "seattle");
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_some());
        assert_eq!(keys[0], "san-diego");
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_none());
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_special_value_scalar() {
    let path = temp_path("pinf.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "roundtrip_test", 0));
        assert!(gdx.data_write_raw_start("plusinf", "", 0, DataType::Parameter, 0));
        assert!(gdx.data_write_raw(&[], &[SV_PINF, 0.0, 0.0, 0.0, 0.0]));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        // the classifier byte alone encodes the special value, no payload
        let bytes = std::fs::read(&path).unwrap();
        let tag = [6u8, b'_', b'D', b'A', b'T', b'A', b'_'];
        let at = bytes
            .windows(tag.len())
            .position(|w| w == tag)
            .expect("record stream tag");
        let rec = &bytes[at + tag.len()..];
        assert_eq!(rec[0], 0); // dimension
        // rec[1..5] is the record count, then the single record
        assert_eq!(rec[5], 1); // key byte for a scalar
        assert_eq!(rec[6], 2); // classifier for +inf
        assert_eq!(rec[7], 255); // end of stream
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        let nr_recs = gdx.data_read_raw_start(1).unwrap();
        assert_eq!(nr_recs, 1);
        let mut keys = [0i32; 20];
        let mut vals = [0.0f64; 5];
        assert!(gdx.data_read_raw(&mut keys, &mut vals).is_some());
        assert_eq!(vals[0].to_bits(), SV_PINF.to_bits());
        let (is_special, sv) = gdx.map_value(vals[0]);
        assert!(is_special);
        assert_eq!(sv, Sv::PINF);
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_scalar_default_record() {
    let path = temp_path("scalar.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "roundtrip_test", 0));
        // a free variable scalar with no records at all
        assert!(gdx.data_write_raw_start("z", "objective", 0, DataType::Variable, 5));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        let (rec_cnt, user_info, _) = gdx.symbol_info_x(1).unwrap();
        assert_eq!(rec_cnt, 1); // scalars always report one record
        assert_eq!(user_info, 5);
        let nr_recs = gdx.data_read_raw_start(1).unwrap();
        assert_eq!(nr_recs, 1);
        let mut keys = [0i32; 20];
        let mut vals = [0.0f64; 5];
        assert!(gdx.data_read_raw(&mut keys, &mut vals).is_some());
        // default record of a free variable
        assert_eq!(vals[0], 0.0);
        assert_eq!(vals[2].to_bits(), gdxfile::values::SV_MINF.to_bits());
        assert_eq!(vals[3].to_bits(), SV_PINF.to_bits());
        assert_eq!(vals[4], 1.0);
        assert!(gdx.data_read_raw(&mut keys, &mut vals).is_none());
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_empty_symbol() {
    let path = temp_path("empty.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "roundtrip_test", 0));
        assert!(gdx.data_write_str_start("nothing", "", 2, DataType::Parameter, 0));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        let nr_recs = gdx.data_read_str_start(1).unwrap();
        assert_eq!(nr_recs, 0);
        let mut keys = vec![String::new(); 20];
        let mut vals = [0.0f64; 5];
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_none());
        assert_eq!(gdx.get_last_error(), 0);
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_set_texts_and_comments() {
    let path = temp_path("texts.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "roundtrip_test", 0));
        assert!(gdx.data_write_str_start("i", "cities", 1, DataType::Set, 0));
        let txt = gdx.add_set_text("hub city").unwrap();
        assert_eq!(txt, 1);
        assert!(gdx.data_write_str(&["alpha"], &[txt as f64]));
        assert!(gdx.data_write_str(&["beta"], &[0.0]));
        assert!(gdx.symbol_add_comment(0, "first comment"));
        assert!(gdx.symbol_add_comment(0, "second comment"));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        assert!(gdx.set_has_text(1));
        assert_eq!(gdx.symbol_get_comment(1, 1).unwrap(), "first comment");
        assert_eq!(gdx.symbol_get_comment(1, 2).unwrap(), "second comment");
        assert!(gdx.symbol_get_comment(1, 3).is_none());

        let mut keys = vec![String::new(); 20];
        let mut vals = [0.0f64; 5];
        gdx.data_read_str_start(1).unwrap();
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_some());
        assert_eq!(keys[0], "alpha");
        let (txt, node) = gdx.get_elem_text(vals[0] as i32).unwrap();
        assert_eq!(txt, "hub city");
        assert_eq!(node, 0);
        gdx.data_read_done();
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_expl_text_sanitized() {
    let path = temp_path("expl.gdx");
    let mut gdx = GdxFile::new();
    assert!(gdx.open_write_ex(&path, "roundtrip_test", 0));
    assert!(gdx.data_write_str_start("p", "mixed \"quotes' and\tctl", 0, DataType::Parameter, 0));
    assert!(gdx.data_write_done());
    let (_, _, expl) = gdx.symbol_info_x(1).unwrap();
    assert_eq!(expl, "mixed \"quotes\" and?ctl");
    gdx.close();
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_uel_length_limits() {
    let path = temp_path("uellen.gdx");
    let mut gdx = GdxFile::new();
    assert!(gdx.open_write_ex(&path, "roundtrip_test", 0));
    assert!(gdx.uel_register_raw_start());
    let ok: String = std::iter::repeat('u').take(63).collect();
    let too_long: String = std::iter::repeat('u').take(64).collect();
    assert!(gdx.uel_register_raw(&ok));
    assert!(!gdx.uel_register_raw(&too_long));
    assert_eq!(gdx.get_last_error(), errors::ERR_BADUELSTR);
    assert!(gdx.uel_register_done());
    gdx.close();
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_bad_mode_rejected() {
    let path = temp_path("badmode.gdx");
    let mut gdx = GdxFile::new();
    assert!(gdx.open_write_ex(&path, "roundtrip_test", 0));
    // no write has been started
    assert!(!gdx.data_write_raw(&[1], &[1.0, 0.0, 0.0, 0.0, 0.0]));
    assert_eq!(gdx.get_last_error(), errors::ERR_BADMODE);
    // reads are not available on a writer
    assert!(gdx.data_read_raw_start(1).is_none());
    gdx.close();
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_bad_header_rejected() {
    let path = temp_path("corrupt.gdx");
    std::fs::write(&path, b"this is not a gdx file at all, not even close").unwrap();
    let mut gdx = GdxFile::new();
    assert!(!gdx.open_read(&path));
    assert_ne!(gdx.get_last_error(), 0);
    std::fs::remove_file(&path).unwrap();
}
