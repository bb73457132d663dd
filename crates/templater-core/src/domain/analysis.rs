//! Pattern-based extraction of referenced types and imported modules.
//!
//! The matchers are line-anchored and know nothing about the language beyond
//! a handful of declaration shapes:
//!
//! ```text
//! class Foo: Bar, Baz {           inherited-type list
//! extension Foo: Bar {            extended type + inherited-type list
//! var items: [Item]               property with a type annotation
//! let model = LoginModel()        property with an initializer
//! import Alamofire                module import
//! ```

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

const MODIFIERS: &str = r"(?:(?:@\w+(?:\([^)]*\))?|public|private|fileprivate|internal|open|final|static|class|lazy|weak|unowned|override|indirect|mutating|nonisolated|(?:private|fileprivate|internal|public)\(set\))\s+)*";

static INHERITANCE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"(?m)^\s*{MODIFIERS}(?:class|struct|enum|protocol|extension|actor)\s+[A-Za-z_][\w.]*(?:<[^>\n]*>)?\s*:\s*(?P<commalist>[^{{\n]+)"
    ))
});

static EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"(?m)^\s*{MODIFIERS}extension\s+(?P<singleName>[A-Z][\w]*)"
    ))
});

static ANNOTATED: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"(?m)^\s*{MODIFIERS}(?:let|var)\s+\w+\s*:\s*(?P<singleName>[^=\n{{]+)"
    ))
});

static INITIALIZED: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"(?m)^\s*{MODIFIERS}(?:let|var)\s+\w+\s*=\s*(?P<singleName>[^\n]+)"
    ))
});

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?m)^\s*(?:@\w+\s+)*import\s+(?:(?:class|struct|enum|protocol|func|var|let|typealias)\s+)?(?P<module>[A-Za-z_]\w*)",
    )
});

static SINGLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^[\s\[(]*(?P<name>[A-Z][a-zA-Z0-9]*)"));

/// Declaration keywords used to locate a type's defining file.
pub const DEFINITION_KEYWORDS: [&str; 5] = ["class", "struct", "enum", "protocol", "typealias"];

static DEFINITIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DEFINITION_KEYWORDS
        .iter()
        .map(|kw| {
            pattern(&format!(
                r"(?m)^\s*{MODIFIERS}{kw}\s+(?P<name>[A-Za-z_]\w*)"
            ))
        })
        .collect()
});

fn pattern(src: &str) -> Regex {
    Regex::new(src).expect("built-in analyzer pattern must compile")
}

/// Types every target platform ships with; never reported as dependencies.
pub const SYSTEM_TYPES: &[&str] = &[
    // Swift standard library
    "Any", "AnyObject", "Array", "Bool", "CaseIterable", "Character", "Codable", "Comparable",
    "CustomStringConvertible", "Decodable", "Dictionary", "Double", "Encodable", "Equatable",
    "Error", "Float", "Hashable", "Int", "Never", "Optional", "Result", "Self", "Set", "String",
    "Void",
    // Foundation
    "AffineTransform", "Bundle", "Calendar", "CharacterSet", "Data", "Date", "DateComponents",
    "DateFormatter", "DateInterval", "Decimal", "DispatchQueue", "IndexPath", "IndexSet",
    "JSONDecoder", "JSONEncoder", "Locale", "Measurement", "NSAffineTransform", "NSArray",
    "NSCalendar", "NSCharacterSet", "NSData", "NSDate", "NSDateComponents", "NSDateInterval",
    "NSDecimalNumber", "NSDictionary", "NSIndexPath", "NSIndexSet", "NSLocale", "NSMeasurement",
    "NSNotification", "NSNumber", "NSObject", "NSPersonNameComponents", "NSSet", "NSString",
    "NSTimeZone", "NSURL", "NSURLComponents", "NSURLQueryItem", "NSURLRequest", "Notification",
    "NotificationCenter", "NumberFormatter", "PersonNameComponents", "TimeInterval", "TimeZone",
    "Timer", "URL", "URLComponents", "URLQueryItem", "URLRequest", "URLSession", "UUID",
    "UserDefaults",
    // CoreGraphics
    "CGFloat", "CGPoint", "CGRect", "CGSize",
    // UIKit
    "NSDirectionalEdgeInsets", "NSDirectionalRectEdge", "NSLayoutConstraint",
    "UIActivityIndicatorView", "UIApplication", "UIApplicationDelegate", "UIAxis",
    "UIBarButtonItem", "UIBarButtonItemGroup", "UIBarItem", "UIBlurEffect", "UIButton",
    "UICollectionView", "UICollectionViewCell", "UIColor", "UIColorWell", "UIControl",
    "UIDatePicker", "UIDirectionalRectEdge", "UIEdgeInsets", "UIFont", "UIImage", "UIImageView",
    "UILabel", "UILargeContentViewerInteraction", "UINavigationBar", "UINavigationController",
    "UINavigationViewController", "UIOffset", "UIPageControl", "UIPickerView", "UIProgressView",
    "UIResponder", "UIScreen", "UIScrollView", "UISearchBar", "UISearchTextField",
    "UISearchToken", "UISegmentedControl", "UISlider", "UIStackView", "UIStepper",
    "UIStoryboard", "UISwitch", "UITabBar", "UITabBarItem", "UITableView", "UITableViewCell",
    "UITableViewDataSource", "UITableViewDelegate", "UITextField", "UITextView", "UIToolbar",
    "UIVibrancyEffect", "UIView", "UIViewController", "UIVisualEffect", "UIVisualEffectView",
    "UIWebView", "UIWindow",
];

pub const SYSTEM_FRAMEWORKS: &[&str] = &["Foundation", "UIKit", "Swift", "XCTest"];

/// Project-relevant types and third-party modules referenced by some text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    pub types: BTreeSet<String>,
    pub frameworks: BTreeSet<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `text` and keep only names absent from the system allow-lists.
    pub fn scan(text: &str) -> Self {
        let mut types = BTreeSet::new();

        for caps in INHERITANCE.captures_iter(text) {
            for element in caps["commalist"].split(',') {
                if let Some(name) = leading_type_name(element.trim()) {
                    types.insert(name.to_owned());
                }
            }
        }

        for re in [&*EXTENSION, &*ANNOTATED, &*INITIALIZED] {
            for caps in re.captures_iter(text) {
                if let Some(name) = leading_type_name(&caps["singleName"]) {
                    types.insert(name.to_owned());
                }
            }
        }

        let frameworks = IMPORT
            .captures_iter(text)
            .map(|caps| caps["module"].to_owned())
            .filter(|m| !SYSTEM_FRAMEWORKS.contains(&m.as_str()))
            .collect();

        types.retain(|t| !SYSTEM_TYPES.contains(&t.as_str()));

        Self { types, frameworks }
    }

    /// Union `other` into `self`.
    pub fn union(&mut self, other: DependencySet) {
        self.types.extend(other.types);
        self.frameworks.extend(other.frameworks);
    }

    pub fn clear(&mut self) {
        self.types.clear();
        self.frameworks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.frameworks.is_empty()
    }
}

/// Leading capitalized identifier in a type expression such as `[Item]?`.
fn leading_type_name(text: &str) -> Option<&str> {
    SINGLE_NAME
        .captures(text)
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str())
}

/// Names declared in `text` by any of the [`DEFINITION_KEYWORDS`].
pub fn declared_types(text: &str) -> BTreeSet<String> {
    DEFINITIONS
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .map(|caps| caps["name"].to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn inheritance_list_is_split_and_filtered() {
        let deps = DependencySet::scan(
            "final class LoginViewController: UIViewController, LoginViewProtocol, Themeable {\n}",
        );
        assert_eq!(deps.types, set(&["LoginViewProtocol", "Themeable"]));
    }

    #[test]
    fn annotated_and_initialized_properties() {
        let text = r#"
            private weak var coordinator: AppCoordinator?
            let items: [Item] = []
            lazy var model = LoginModel(api: api)
            var count: Int = 0
            let title = "Login"
        "#;
        let deps = DependencySet::scan(text);
        assert_eq!(deps.types, set(&["AppCoordinator", "Item", "LoginModel"]));
    }

    #[test]
    fn uikit_controls_are_not_dependencies() {
        let text = r#"
            final class SettingsCell: UIControl, SettingsRow {
                let toggle = UISwitch()
                var notes: UITextView
                let spinner: UIActivityIndicatorView
                private let slider = UISlider(frame: .zero)
                var modes: UISegmentedControl?
                let done = UIBarButtonItem(title: "Done")
                var amount: Decimal
                var ratio: NSNumber
                let zone: TimeZone = .current
            }
        "#;
        let deps = DependencySet::scan(text);
        assert_eq!(deps.types, set(&["SettingsRow"]));

        let one_line = DependencySet::scan(
            "final class Cell: UIControl { let toggle = UISwitch() var text: UITextView let spinner: UIActivityIndicatorView }",
        );
        assert!(one_line.types.is_empty(), "{:?}", one_line.types);
    }

    #[test]
    fn imports_drop_system_frameworks() {
        let text = "import UIKit\nimport Foundation\n@testable import Alamofire\nimport struct Kingfisher.ImageResource\n";
        let deps = DependencySet::scan(text);
        assert_eq!(deps.frameworks, set(&["Alamofire", "Kingfisher"]));
        assert!(deps.types.is_empty());
    }

    #[test]
    fn extension_records_extended_type() {
        let deps = DependencySet::scan("extension LoginView: Reusable {}\n");
        assert_eq!(deps.types, set(&["LoginView", "Reusable"]));
    }

    #[test]
    fn union_accumulates() {
        let mut acc = DependencySet::scan("import Alamofire\nvar a: Foo\n");
        acc.union(DependencySet::scan("import SnapKit\nvar b: Bar\n"));
        assert_eq!(acc.types, set(&["Bar", "Foo"]));
        assert_eq!(acc.frameworks, set(&["Alamofire", "SnapKit"]));
        acc.clear();
        assert!(acc.is_empty());
    }

    #[test]
    fn declared_types_covers_all_keywords() {
        let text = "public final class A {}\nstruct B {}\nenum C {}\nprotocol D {}\ntypealias E = Int\nfunc notAType() {}\n";
        assert_eq!(declared_types(text), set(&["A", "B", "C", "D", "E"]));
    }
}
