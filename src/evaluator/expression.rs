//! The Nix expression handed to `nix eval`.
//!
//! It evaluates one module with `lib.evalModules`, flattens its options with
//! `lib.optionAttrSetToDocList`, drops invisible and internal options, and
//! returns an attribute set keyed by option name.

const PLACEHOLDER: &str = "@MODULE_PATH@";

const EXPRESSION_TEMPLATE: &str = r#"
(
  {
    pkgs ? import <nixpkgs> {},
    lib ? pkgs.lib,
    optionsPath,
    transformOptions ? lib.id,
  }:
  with lib;
  with builtins; let
    options = evalModules {modules = [optionsPath];};
    rawOpts = optionAttrSetToDocList options;
    transformedOpts = map transformOptions rawOpts;
    filteredOpts = filter (opt: opt.visible && !opt.internal) transformedOpts;
    optionsList = flip map filteredOpts (opt: opt);
    optionsNix = listToAttrs (map (o: {
        name = o.name;
        value = removeAttrs o ["name" "visible" "internal"];
      })
      optionsList);
  in
    optionsNix
) {optionsPath = @MODULE_PATH@;}
"#;

/// Builds the evaluation expression for `module_path`.
///
/// The module path is inserted verbatim as a Nix expression, so it may be a
/// path literal (`./modules/foo.nix`), an import, or any other expression
/// evaluating to a module.
#[must_use]
pub fn nix_expression(module_path: &str) -> String {
    EXPRESSION_TEMPLATE.replace(PLACEHOLDER, module_path)
}
