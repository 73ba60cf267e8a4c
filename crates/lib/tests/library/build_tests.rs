use std::time::{Duration, SystemTime};

use unibuild_lib::asset::BuildOptions;
use unibuild_lib::execute::{Builder, ExecuteConfig};

use super::common::{load, read, write_project};

const SITE_CONFIG: &str = r#"
return {
  setup = function(ub)
    local function path(p) return ub.dir .. "/" .. p end

    local header = ub.asset("header", {
      input = path("src/header.html"),
      outfile = path("header.out"),
      build = function(_, html) return "<header>" .. html .. "</header>" end,
    })
    local body = ub.asset("body", {
      input = path("src/body.html"),
      outfile = path("body.out"),
      build = function(_, html) return "<main>" .. html .. "</main>" end,
    })
    ub.asset("page", {
      input = { header, body },
      outfile = path("page.out"),
      build = function(config, header, body)
        local page = header .. body
        if config.release then
          page = string.gsub(page, "%s+", "")
        end
        return page
      end,
    })
  end,
}
"#;

fn site() -> tempfile::TempDir {
  let project = write_project(&[
    ("unibuild.lua", SITE_CONFIG),
    ("src/header.html", "Site title"),
    ("src/body.html", "Hello there"),
  ]);
  let an_hour_ago = SystemTime::now() - Duration::from_secs(3600);
  for input in ["src/header.html", "src/body.html"] {
    let file = std::fs::File::options()
      .write(true)
      .open(project.path().join(input))
      .unwrap();
    file.set_modified(an_hour_ago).unwrap();
  }
  project
}

#[tokio::test]
async fn lua_config_builds_in_stages() {
  let project = site();
  let config = load(&project);
  let builder = Builder::new(config.project(), ExecuteConfig::default());

  let report = builder.build(&[], BuildOptions::default()).await.unwrap();

  assert!(report.is_success(), "failures: {:?}", report.failed);
  assert_eq!(report.stages.len(), 2);
  assert_eq!(report.stages[1], vec!["page"]);
  assert_eq!(
    read(project.path(), "page.out"),
    "<header>Site title</header><main>Hello there</main>"
  );
}

#[tokio::test]
async fn release_mode_reaches_build_functions() {
  let project = site();
  let config = load(&project);
  let builder = Builder::new(config.project(), ExecuteConfig::default());
  let options = BuildOptions {
    release: true,
    ..Default::default()
  };

  builder.build(&["page".to_string()], options).await.unwrap();

  assert_eq!(
    read(project.path(), "page.out"),
    "<header>Sitetitle</header><main>Hellothere</main>"
  );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn parallel_builds_call_back_into_lua() {
  let project = site();
  let config = load(&project);
  let builder = Builder::new(config.project(), ExecuteConfig::default());
  let options = BuildOptions {
    parallel: true,
    ..Default::default()
  };

  let report = builder.build(&[], options).await.unwrap();

  assert!(report.is_success(), "failures: {:?}", report.failed);
  assert_eq!(report.built.len(), 3);
  assert!(project.path().join("header.out").exists());
  assert!(project.path().join("body.out").exists());
}

#[tokio::test]
async fn second_build_has_nothing_to_do() {
  let project = site();
  let config = load(&project);
  let builder = Builder::new(config.project(), ExecuteConfig::default());

  builder.build(&[], BuildOptions::default()).await.unwrap();
  let report = builder.build(&[], BuildOptions::default()).await.unwrap();

  assert!(report.stages.is_empty());
  assert!(report.built.is_empty());
}
