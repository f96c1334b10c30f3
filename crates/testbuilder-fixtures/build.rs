use testbuilder_gen::{BuildScript, GeneratorConfig, ShadowPolicy, Visibility};

fn main() -> anyhow::Result<()> {
  let config = GeneratorConfig::builder()
    .visibility(Visibility::Crate)
    .shadow_policy(ShadowPolicy::MostDerived)
    .build();

  let output = BuildScript::builder().config(config).build().run()?;
  if output.has_errors() {
    anyhow::bail!("builder generation reported {} error(s)", output.errors().count());
  }
  Ok(())
}
