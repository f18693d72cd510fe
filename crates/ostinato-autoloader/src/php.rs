//! Static PHP glue emitted into the vendor root.
//!
//! The loader implements the same lookup order as the ecosystem's
//! canonical class loader (classmap, then PSR-4, then PSR-0) and exposes
//! the accessor methods frameworks probe for.

/// `ClassLoader.php`: the runtime class loader implementation.
pub(crate) const CLASS_LOADER: &str = r#"<?php

// ClassLoader.php @generated by ostinato

namespace Composer\Autoload;

class ClassLoader
{
    private $prefixesPsr4 = [];
    private $prefixesPsr0 = [];
    private $classMap = [];

    public function addPsr4($prefix, $baseDir)
    {
        $baseDir = rtrim($baseDir, '/\\') . '/';

        if (!isset($this->prefixesPsr4[$prefix])) {
            $this->prefixesPsr4[$prefix] = [];
        }
        $this->prefixesPsr4[$prefix][] = $baseDir;
    }

    public function add($prefix, $baseDir)
    {
        $baseDir = rtrim($baseDir, '/\\') . '/';

        if (!isset($this->prefixesPsr0[$prefix])) {
            $this->prefixesPsr0[$prefix] = [];
        }
        $this->prefixesPsr0[$prefix][] = $baseDir;
    }

    public function register()
    {
        spl_autoload_register([$this, 'loadClass']);
    }

    public function loadClass($class)
    {
        if ($file = $this->findFile($class)) {
            require $file;
            return true;
        }
        return false;
    }

    public function findFile($class)
    {
        if (isset($this->classMap[$class])) {
            return $this->classMap[$class];
        }

        if ($file = $this->findFilePsr4($class)) {
            if (file_exists($file)) {
                return $file;
            }
        }

        if ($file = $this->findFilePsr0($class)) {
            if (file_exists($file)) {
                return $file;
            }
        }

        return false;
    }

    private function findFilePsr4($class)
    {
        foreach ($this->prefixesPsr4 as $prefix => $dirs) {
            $len = strlen($prefix);
            if (strncmp($prefix, $class, $len) === 0) {
                $relativeClass = substr($class, $len);

                foreach ($dirs as $dir) {
                    $file = $dir . str_replace('\\', '/', $relativeClass) . '.php';
                    if (file_exists($file)) {
                        return $file;
                    }
                }
            }
        }

        return false;
    }

    private function findFilePsr0($class)
    {
        $logicalPath = str_replace('\\', '/', $class) . '.php';

        foreach ($this->prefixesPsr0 as $prefix => $dirs) {
            if (strpos($class, $prefix) === 0) {
                foreach ($dirs as $dir) {
                    $file = $dir . $logicalPath;
                    if (file_exists($file)) {
                        return $file;
                    }
                }
            }
        }

        return false;
    }

    public function getPrefixes()
    {
        return $this->prefixesPsr0;
    }

    public function getPrefixesPsr4()
    {
        return $this->prefixesPsr4;
    }

    public function getClassMap()
    {
        return $this->classMap;
    }

    public function addClassMap(array $classMap)
    {
        if ($this->classMap) {
            $this->classMap = array_merge($this->classMap, $classMap);
        } else {
            $this->classMap = $classMap;
        }
    }

    public function getFallbackDirs()
    {
        return array();
    }

    public function getFallbackDirsPsr4()
    {
        return array();
    }
}
"#;

/// `composer/InstalledVersions.php`: a queryable resolved-set facade.
pub(crate) const INSTALLED_VERSIONS: &str = r#"<?php

// InstalledVersions.php @generated by ostinato

namespace Composer;

class InstalledVersions
{
    public static function getInstalledPackages()
    {
        $packages = array();
        if (file_exists(__DIR__ . '/installed.json')) {
            $installed = json_decode(file_get_contents(__DIR__ . '/installed.json'), true);
            foreach ($installed['packages'] as $package) {
                $packages[] = $package['name'];
            }
        }
        return $packages;
    }

    public static function isInstalled($packageName, $includeDevRequirements = true)
    {
        return in_array($packageName, self::getInstalledPackages(), true);
    }

    public static function getVersion($packageName)
    {
        if (file_exists(__DIR__ . '/installed.json')) {
            $installed = json_decode(file_get_contents(__DIR__ . '/installed.json'), true);
            foreach ($installed['packages'] as $package) {
                if ($package['name'] === $packageName) {
                    return $package['version'];
                }
            }
        }
        return null;
    }

    public static function getVersionRanges($packageName)
    {
        return self::getVersion($packageName);
    }

    public static function getAllRawData()
    {
        if (file_exists(__DIR__ . '/installed.json')) {
            return array(
                'root' => array('install_path' => dirname(__DIR__, 2)),
                'versions' => json_decode(file_get_contents(__DIR__ . '/installed.json'), true),
            );
        }
        return array();
    }
}
"#;

/// `composer/platform_check.php`: host-runtime version assertion.
pub(crate) const PLATFORM_CHECK: &str = r#"<?php

// platform_check.php @generated by ostinato

$issues = array();

if (!(PHP_VERSION_ID >= 70205)) {
    $issues[] = 'Your dependencies require a PHP version ">= 7.2.5". You are running ' . PHP_VERSION . '.';
}

if ($issues) {
    if (!headers_sent()) {
        header('HTTP/1.1 500 Internal Server Error');
    }
    if (!ini_get('display_errors')) {
        if (PHP_SAPI === 'cli' || PHP_SAPI === 'phpdbg') {
            fwrite(STDERR, 'Platform check detected issues:' . PHP_EOL.PHP_EOL . implode(PHP_EOL, $issues) . PHP_EOL.PHP_EOL);
        } elseif (!headers_sent()) {
            echo 'Platform check detected issues:' . PHP_EOL.PHP_EOL . implode(PHP_EOL, $issues) . PHP_EOL.PHP_EOL;
        }
    }
    trigger_error(
        'Platform check detected issues: ' . implode(' ', $issues),
        E_USER_ERROR
    );
}
"#;

/// `autoload_runtime.php`: Symfony Runtime entrypoint, emitted only when
/// the resolved set contains `symfony/runtime`.
pub(crate) const RUNTIME_AUTOLOAD: &str = r#"<?php

// autoload_runtime.php @generated by ostinato

if (true === (require_once __DIR__.'/autoload.php') || empty($_SERVER['SCRIPT_FILENAME'])) {
    return;
}

$app = require $_SERVER['SCRIPT_FILENAME'];

if (!is_object($app)) {
    throw new TypeError(sprintf('Invalid return value: callable object expected, "%s" returned from "%s".', get_debug_type($app), $_SERVER['SCRIPT_FILENAME']));
}

$runtime = $_SERVER['APP_RUNTIME'] ?? $_ENV['APP_RUNTIME'] ?? 'Symfony\\Component\\Runtime\\SymfonyRuntime';
$runtime = new $runtime(($_SERVER['APP_RUNTIME_OPTIONS'] ?? $_ENV['APP_RUNTIME_OPTIONS'] ?? []) + [
        'project_dir' => dirname(__DIR__, 1),
    ]);

[$app, $args] = $runtime
    ->getResolver($app)
    ->resolve();

$app = $app(...$args);

exit(
$runtime
    ->getRunner($app)
    ->run()
);
"#;

/// Escape a PHP namespace for use inside a single-quoted string literal.
pub(crate) fn escape_namespace(namespace: &str) -> String {
    namespace.replace('\\', "\\\\")
}
