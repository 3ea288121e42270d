use gdxfile::container::GdxFile;
use gdxfile::symbols::DataType;
use gdxfile::values::ACRONYM_SCALE;

fn temp_path(name: &str) -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("gdx_aa_{}_{}", std::process::id(), name));
    p.to_string_lossy().into_owned()
}

#[test]
fn test_alias_reads_target_records() {
    let path = temp_path("alias.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "alias_test", 0));
        assert!(gdx.data_write_str_start("i", "", 1, DataType::Set, 0));
        assert!(gdx.data_write_str(&["p1"], &[0.0]));
        assert!(gdx.data_write_str(&["p2"], &[0.0]));
        assert!(gdx.data_write_done());
        assert!(gdx.add_alias("i", "j"));
        assert!(gdx.add_alias("*", "univ"));
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        assert_eq!(gdx.system_info().0, 3);

        let synr = gdx.find_symbol("j").unwrap();
        let (_, dim, typ) = gdx.symbol_info(synr).unwrap();
        assert_eq!(typ, DataType::Alias);
        assert_eq!(dim, 1);
        let (_, user_info, expl) = gdx.symbol_info_x(synr).unwrap();
        assert_eq!(user_info, 1); // target symbol index
        assert_eq!(expl, "Aliased with i");

        // reading through the alias lands on the target's records
        let nr_recs = gdx.data_read_str_start(synr).unwrap();
        assert_eq!(nr_recs, 2);
        let mut keys = vec![String::new(); 20];
        let mut vals = [0.0f64; 5];
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_some());
        assert_eq!(keys[0], "p1");
        gdx.data_read_done();

        // an alias of the universe iterates the UEL table
        let synr = gdx.find_symbol("univ").unwrap();
        let nr_recs = gdx.data_read_str_start(synr).unwrap();
        assert_eq!(nr_recs, 2);
        gdx.data_read_done();
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_acronym_roundtrip() {
    let path = temp_path("acro.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "acro_test", 0));
        assert_eq!(gdx.acronym_add("maybe", "maybe so", 7), 1);
        assert_eq!(gdx.acronym_count(), 1);
        assert!(gdx.data_write_str_start("p", "", 1, DataType::Parameter, 0));
        let v = gdx.acronym_value(7);
        assert!(gdx.data_write_str(&["k"], &[v]));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        assert_eq!(gdx.acronym_count(), 1);
        let (name, text, map) = gdx.acronym_get_info(1).unwrap();
        assert_eq!(name, "maybe");
        assert_eq!(text, "maybe so");
        assert_eq!(map, 7);

        gdx.data_read_raw_start(1).unwrap();
        let mut keys = [0i32; 20];
        let mut vals = [0.0f64; 5];
        assert!(gdx.data_read_raw(&mut keys, &mut vals).is_some());
        assert_eq!(vals[0].to_bits(), (ACRONYM_SCALE * 7.0).to_bits());
        assert_eq!(gdx.acronym_index(vals[0]), 7);
        assert_eq!(gdx.acronym_name(vals[0]).unwrap(), "maybe");
        gdx.data_read_done();
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_unregistered_acronym_auto_generates() {
    let path = temp_path("autoacro.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "acro_test", 0));
        assert!(gdx.data_write_str_start("p", "", 1, DataType::Parameter, 0));
        // value written without declaring the acronym first
        let v = gdx.acronym_value(12);
        assert!(gdx.data_write_str(&["k"], &[v]));
        assert!(gdx.data_write_done());
        // the writer kept track of the unnamed code
        assert_eq!(gdx.acronym_count(), 1);
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        let (name, _, map) = gdx.acronym_get_info(1).unwrap();
        assert_eq!(name, "UnknownACRO12");
        assert_eq!(map, 12);

        // with auto generation enabled the code is remapped on read
        assert_eq!(gdx.acronym_next_nr(5), 0);
        gdx.data_read_raw_start(1).unwrap();
        let mut keys = [0i32; 20];
        let mut vals = [0.0f64; 5];
        assert!(gdx.data_read_raw(&mut keys, &mut vals).is_some());
        assert_eq!(vals[0].to_bits(), (ACRONYM_SCALE * 5.0).to_bits());
        let (org, new, auto) = gdx.acronym_get_mapping(1).unwrap();
        assert_eq!(org, 12);
        assert_eq!(new, 5);
        assert!(auto);
        gdx.data_read_done();
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_rename_uel_keeps_records() {
    let path = temp_path("rename.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "rename_test", 0));
        assert!(gdx.data_write_str_start("p", "", 1, DataType::Parameter, 0));
        assert!(gdx.data_write_str(&["old"], &[42.0]));
        assert!(gdx.data_write_str(&["other"], &[1.0]));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.rename_uel("old", "brand_new"), 0);
        assert_eq!(gdx.rename_uel("missing", "x"), 2);
        assert_eq!(gdx.rename_uel("other", "brand_new"), 3);
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        let (n, _) = gdx.um_find_uel("brand_new").unwrap();
        assert_eq!(n, 1);
        assert!(gdx.um_find_uel("old").is_none());
        gdx.data_read_str_start(1).unwrap();
        let mut keys = vec![String::new(); 20];
        let mut vals = [0.0f64; 5];
        assert!(gdx.data_read_str(&mut keys, &mut vals).is_some());
        assert_eq!(keys[0], "brand_new");
        assert_eq!(vals[0], 42.0);
        gdx.data_read_done();
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_slice_read() {
    let path = temp_path("slice.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "slice_test", 0));
        assert!(gdx.data_write_str_start("p", "", 2, DataType::Parameter, 0));
        assert!(gdx.data_write_str(&["a", "x"], &[1.0]));
        assert!(gdx.data_write_str(&["a", "y"], &[2.0]));
        assert!(gdx.data_write_str(&["b", "x"], &[3.0]));
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        let counts = gdx.data_read_slice_start(1).unwrap();
        assert_eq!(counts[0], 2);
        assert_eq!(counts[1], 2);

        let mut seen = Vec::new();
        let dimen = {
            let mut dp = |keys: &[i32], vals: &[f64]| seen.push((keys.to_vec(), vals[0]));
            gdx.data_read_slice(&["a", ""], &mut dp).unwrap()
        };
        assert_eq!(dimen, 1);
        assert_eq!(seen, vec![(vec![0], 1.0), (vec![1], 2.0)]);

        let uels = gdx.data_slice_uels(&[1]).unwrap();
        assert_eq!(uels, vec!["a".to_string(), "y".to_string()]);
        gdx.data_read_done();
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_raw_fast_read() {
    let path = temp_path("fast.gdx");
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_write_ex(&path, "fast_test", 0));
        assert!(gdx.data_write_str_start("p", "", 1, DataType::Parameter, 0));
        for n in 0..10 {
            let name = format!("u{}", n);
            assert!(gdx.data_write_str(&[name.as_str()], &[n as f64]));
        }
        assert!(gdx.data_write_done());
        assert_eq!(gdx.close(), 0);
    }
    {
        let mut gdx = GdxFile::new();
        assert!(gdx.open_read(&path));
        let mut total = 0.0;
        let mut count = 0;
        let n = {
            let mut dp = |_keys: &[i32], vals: &[f64]| {
                total += vals[0];
                count += 1;
            };
            gdx.data_read_raw_fast(1, &mut dp).unwrap()
        };
        assert_eq!(n, 10);
        assert_eq!(count, 10);
        assert_eq!(total, 45.0);

        // fix the key to a single element
        let mut hits = Vec::new();
        let ok = {
            let mut dp = |keys: &[i32], vals: &[f64]| hits.push((keys[0], vals[0]));
            gdx.data_read_raw_fast_filt(1, &["u7"], &mut dp)
        };
        assert!(ok);
        assert_eq!(hits, vec![(8, 7.0)]);
        gdx.close();
    }
    std::fs::remove_file(&path).unwrap();
}
